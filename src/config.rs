//! Configuration module
//!
//! Layered configuration: built-in defaults, an optional `config.toml`, and
//! `ACME_GATE_`-prefixed environment variables, highest last.

use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub acme: AcmeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Largest request body, in bytes, the dispatcher will buffer.
    pub max_body_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AcmeConfig {
    /// Directory the file-backed secret store writes under.
    pub store_dir: String,
    /// Bearer token that identifies the admin caller.
    pub admin_token: String,
    /// Email recorded as `updated_by` on saved secrets.
    pub admin_email: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("ACME_GATE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("http.max_body_size", 10 * 1024 * 1024)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("acme.store_dir", "./data")?
            .set_default("acme.admin_token", "")?
            .set_default("acme.admin_email", "")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_a_config_file() {
        let cfg = Config::load().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.http.max_body_size, 10 * 1024 * 1024);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.acme.store_dir, "./data");
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let cfg = Config::load().unwrap();
        assert_eq!(cfg.socket_addr().unwrap().port(), 8080);
    }
}
