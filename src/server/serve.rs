// Server loop module
// Accepts connections until shutdown, then drains in-flight ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the active connection count
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop until a shutdown signal arrives.
///
/// After the listener is closed, every open connection is told to close once
/// its current exchange is done, and the loop waits up to
/// `performance.shutdown_timeout` seconds for them to finish. Returns the
/// number of connections still open when it gave up.
pub async fn run(listener: TcpListener, state: Arc<AppState>, signals: Arc<SignalHandler>) -> usize {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let (close_tx, close_rx) = watch::channel(false);

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
                            &close_rx,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    close_tx.send_replace(true);
    logger::log_shutdown_started(active_connections.load(Ordering::SeqCst));

    let drain_timeout = Duration::from_secs(state.config.performance.shutdown_timeout);
    let remaining = drain(&active_connections, drain_timeout).await;
    logger::log_shutdown_complete(remaining);
    remaining
}

/// Wait until `active` reaches zero or `timeout` elapses
async fn drain(active: &AtomicUsize, timeout: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let current = active.load(Ordering::SeqCst);
        if current == 0 || tokio::time::Instant::now() >= deadline {
            return current;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
