//! OS signal handling.
//!
//! Translates SIGTERM/SIGINT (and the internal shutdown broadcast used by
//! tests) into one future the server awaits for graceful shutdown. A
//! termination signal stops the accept loop; in-flight requests are not
//! guaranteed to complete.

use tokio::sync::broadcast;

/// Wait for any shutdown trigger: Ctrl+C, SIGTERM, or the broadcast channel.
pub async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received, shutting down"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down"),
        _ = shutdown.recv() => tracing::info!("Shutdown triggered"),
    }
}
