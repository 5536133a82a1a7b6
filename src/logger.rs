//! Logging module
//!
//! One-shot tracing initialization from the logging config, plus the access
//! log line. Handler failures are logged by the dispatcher, not here.

use crate::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// The configured level acts as the default directive; `RUST_LOG` still wins
/// when set. Calling this twice is an error, so it lives in `main` only.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Access log line for one incoming request.
pub fn log_request(method: &hyper::Method, uri: &hyper::Uri) {
    info!(%method, %uri, "request");
}
