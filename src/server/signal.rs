// Signal handling module
//
// SIGTERM and SIGINT (Ctrl+C elsewhere) request a graceful shutdown.

use std::sync::Arc;
use tokio::sync::Notify;

/// Spawn a task that notifies `shutdown` on the first termination signal.
///
/// Uses `notify_one` so a signal that arrives before the accept loop starts
/// waiting is not lost.
#[cfg(unix)]
pub fn spawn_shutdown_listener(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!("Failed to register signal handlers: {e}");
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("SIGTERM received"),
            _ = sigint.recv() => tracing::info!("SIGINT received"),
        }
        shutdown.notify_one();
    });
}

/// Non-unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn spawn_shutdown_listener(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl+C received");
                shutdown.notify_one();
            }
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {e}"),
        }
    });
}
