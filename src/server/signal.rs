// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use crate::logger;

/// Resolves on the first SIGINT or SIGTERM
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            ctrl_c().await;
            logger::log_info("SIGINT received, shutting down");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => logger::log_info("SIGTERM received, shutting down"),
        () = ctrl_c() => logger::log_info("SIGINT received, shutting down"),
    }
}

async fn ctrl_c() {
    wait_for(tokio::signal::ctrl_c(), "Ctrl+C").await;
}

/// Resolves when `signal` fires. A failed registration never resolves, so
/// the other signal sources stay in charge.
async fn wait_for<F>(signal: F, name: &str)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        logger::log_error(&format!("Failed to listen for {name}: {e}"));
        std::future::pending::<()>().await;
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await;
    logger::log_info("Ctrl+C received, shutting down");
}
