// Server loop module
// Accept loop with graceful shutdown

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// How long shutdown waits for in-flight connections to finish.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Accept connections until a shutdown signal arrives, then drain.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) {
    loop {
        // A signal that landed before this iteration registered a waiter
        // would otherwise be lost
        if signals.shutdown_requested.load(Ordering::SeqCst) {
            logger::log_shutdown_signal();
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = signals.shutdown.notified() => {
                logger::log_shutdown_signal();
                break;
            }
        }
    }

    // Stop accepting, then let in-flight connections finish
    drop(listener);
    drain_connections(&active_connections).await;
    logger::log_server_stopped();
}

/// Wait for in-flight connections, up to `DRAIN_TIMEOUT`.
async fn drain_connections(active_connections: &Arc<AtomicUsize>) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown drain timed out with {remaining} connections still active"
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
