// Signal handling module
//
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use crate::logger;

/// Resolves once the process is asked to stop
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                logger::log_warning(&format!(
                    "Failed to register signal handlers ({e}), falling back to Ctrl+C"
                ));
                ctrl_c().await;
                return;
            }
        };

    tokio::select! {
        _ = sigterm.recv() => tracing::info!("SIGTERM received, initiating graceful shutdown"),
        _ = sigint.recv() => tracing::info!("SIGINT received, initiating graceful shutdown"),
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl+C received, initiating graceful shutdown"),
        Err(e) => {
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    }
}
