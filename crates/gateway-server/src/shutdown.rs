//! Graceful shutdown signal handling.

use tracing::info;

/// Resolve when the process receives SIGINT or SIGTERM.
///
/// Intended for `axum::serve(...).with_graceful_shutdown(...)`: once the
/// signal arrives, the server stops accepting connections and drains the
/// in-flight ones.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            info!(error = %e, "failed to listen for ctrl-c, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => info!(error = %e, "failed to listen for SIGTERM, shutting down"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, closing HTTP server");
}
