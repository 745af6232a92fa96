// Server loop module
// Accepts connections until the shutdown future resolves, then drains them

use hyper_util::server::graceful::GracefulShutdown;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop.
///
/// Once `shutdown` completes the listener is closed and every open
/// connection is told to finish its current request and close. Returns when
/// all of them are done or `performance.shutdown_timeout` seconds elapse.
pub async fn start_server_loop<S>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: S,
) -> std::io::Result<()>
where
    S: Future<Output = ()>,
{
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
                            graceful.watcher(),
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                drop(listener);
                break;
            }
        }
    }

    logger::log_shutdown(active_connections.load(Ordering::SeqCst));
    let drain_timeout = Duration::from_secs(state.config.performance.shutdown_timeout);
    if tokio::time::timeout(drain_timeout, graceful.shutdown()).await.is_err() {
        logger::log_warning(&format!(
            "Shutdown timeout ({}s) elapsed, {} connection(s) abandoned",
            drain_timeout.as_secs(),
            active_connections.load(Ordering::SeqCst)
        ));
    } else {
        logger::log_info("All connections closed");
    }
    Ok(())
}
