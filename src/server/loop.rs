// Server loop module
// Accepts connections until shutdown is signalled, then drains in-flight ones

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::error::ServerError;

/// How often the drain phase re-checks the connection counter
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Run the accept loop
///
/// Returns once `shutdown` is notified and in-flight connections have
/// finished, or `performance.request_timeout` has elapsed, whichever is first.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), ServerError> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => tracing::error!("Failed to accept connection: {e}"),
                }
            }

            () = shutdown.notified() => {
                tracing::info!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    drop(listener);
    drain(&state).await;
    Ok(())
}

async fn drain(state: &AppState) {
    let grace = Duration::from_secs(state.config.performance.request_timeout);
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let active = state.active_connections.load(Ordering::SeqCst);
        if active == 0 {
            tracing::info!("All connections closed");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!("Shutting down with {active} connection(s) still open");
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}
