//! Shutdown signal handling for the server

use colored::Colorize;

/// Resolves on Ctrl+C, or SIGTERM on Unix.
///
/// Handler installation failures are logged and that source is ignored.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => eprintln!("\n{} Received Ctrl+C, shutting down", "↓".cyan()),
        _ = terminate => eprintln!("{} Received SIGTERM, shutting down", "↓".cyan()),
    }
}
