// Server loop module
// Accepts connections until a shutdown signal arrives, then drains

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// Accept connections on `listener` until `shutdown` resolves.
///
/// In-flight connections are then given up to `performance.connection_timeout`
/// to finish before the function returns.
pub async fn run(
    listener: TcpListener,
    state: Arc<config::AppState>,
    shutdown: impl Future<Output = ()>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => logger::log_accept_error(&e),
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown(active_connections.load(Ordering::SeqCst));
                break;
            }
        }
    }

    drop(listener);

    let drain_timeout = Duration::from_secs(state.config.performance.connection_timeout);
    if tokio::time::timeout(drain_timeout, graceful.shutdown())
        .await
        .is_err()
    {
        tracing::warn!(
            remaining = active_connections.load(Ordering::SeqCst),
            "drain timed out, dropping remaining connections"
        );
    }
}
