//! Server module
//!
//! The accept loop: one spawned task per connection, every request funneled
//! through the dispatcher. Connections beyond the configured limit are
//! rejected at accept time.

pub mod listener;

pub use listener::create_reusable_listener;

use crate::config::Config;
use crate::handler::{dispatch_limited, Handler};
use crate::logger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Accepts connections forever, serving every request through `handler`.
pub async fn run(
    listener: TcpListener,
    handler: Arc<dyn Handler>,
    config: &Config,
) -> std::io::Result<()> {
    let connections = Arc::new(AtomicUsize::new(0));
    let max_connections = config.server.max_connections;
    let max_body_size = config.http.max_body_size;
    let access_log = config.logging.access_log;

    info!(
        addr = %listener.local_addr()?,
        workers = ?config.server.workers,
        "server started"
    );

    loop {
        let (stream, peer_addr) = listener.accept().await?;

        // Increment first, then check, so two racing accepts cannot both
        // slip under the limit.
        let prev = connections.fetch_add(1, Ordering::SeqCst);
        if let Some(max) = max_connections {
            if prev >= usize::try_from(max).unwrap_or(usize::MAX) {
                connections.fetch_sub(1, Ordering::SeqCst);
                warn!(%peer_addr, active = prev, max, "connection limit reached, rejecting");
                drop(stream);
                continue;
            }
        }

        let handler = handler.clone();
        let connections = connections.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let handler = handler.clone();
                async move {
                    if access_log {
                        logger::log_request(req.method(), req.uri());
                    }
                    Ok::<_, Infallible>(
                        dispatch_limited(handler.as_ref(), req, max_body_size).await,
                    )
                }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!(%peer_addr, "failed to serve connection: {e}");
            }
            connections.fetch_sub(1, Ordering::SeqCst);
        });
    }
}
