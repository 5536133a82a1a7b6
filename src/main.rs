use std::sync::Arc;

use acme_gate::acme::{
    authenticate, require_admin, BearerTokenIdentity, FileStore, IdentityProvider, SaveSecret,
    SecretStore, ServeChallenge,
};
use acme_gate::handler::HandlerExt;
use acme_gate::{logger, server, Config, RouteTable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let store: Arc<dyn SecretStore> = Arc::new(FileStore::new(&cfg.acme.store_dir));
    let provider: Arc<dyn IdentityProvider> = Arc::new(BearerTokenIdentity::new(
        &cfg.acme.admin_token,
        &cfg.acme.admin_email,
    ));

    let routes = RouteTable::new()
        .route(
            "/.well-known/acme-challenge/%token%",
            Arc::new(ServeChallenge::new(store.clone())),
        )
        .route(
            "/acme-secret",
            Arc::new(
                SaveSecret::new(store)
                    .guarded(require_admin())
                    .guarded(authenticate(provider)),
            ),
        );

    server::run(listener, Arc::new(routes), &cfg).await?;
    Ok(())
}
