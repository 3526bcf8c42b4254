// Connection handling module
// Accepts a single TCP connection and serves it on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::api;
use crate::config::AppState;
use crate::logger;

/// Accept a connection unless the configured connection limit is reached.
///
/// `shutdown` flips to `true` when the server stops; the connection then
/// finishes its current exchange and closes. Returns `false` when the
/// connection was rejected and dropped.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    shutdown: &watch::Receiver<bool>,
) -> bool {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return false;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        shutdown.clone(),
    );
    true
}

/// How long a connection stays open before it is asked to close.
///
/// With keep-alive on this is `keep_alive_timeout`. With keep-alive off
/// (`keep_alive_timeout = 0`) each connection carries a single exchange and
/// gets the larger of the read and write timeouts.
pub fn connection_lifetime(state: &AppState) -> Duration {
    let perf = &state.config.performance;
    if perf.keep_alive_timeout > 0 {
        Duration::from_secs(perf.keep_alive_timeout)
    } else {
        Duration::from_secs(std::cmp::max(perf.read_timeout, perf.write_timeout))
    }
}

/// Serve one HTTP/1.1 connection on a spawned task.
///
/// When the lifetime elapses or `shutdown` fires, the connection is closed
/// gracefully: an idle connection closes at once, a busy one after its
/// current response. If it is still open `write_timeout` seconds later it is
/// dropped. The connection counter is decremented when the task finishes.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let close_grace = Duration::from_secs(state.config.performance.write_timeout);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| api::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );
        tokio::pin!(conn);

        let deadline = tokio::time::sleep(connection_lifetime(&state));
        tokio::pin!(deadline);
        let mut closing = false;

        loop {
            tokio::select! {
                result = conn.as_mut() => {
                    if let Err(err) = result {
                        logger::log_connection_error(&err);
                    }
                    break;
                }

                _ = shutdown.changed(), if !closing => {
                    closing = true;
                    conn.as_mut().graceful_shutdown();
                    deadline.as_mut().reset(Instant::now() + close_grace);
                }

                () = &mut deadline => {
                    if closing {
                        logger::log_warning(&format!(
                            "Connection from {peer_addr} still open {} seconds after close was requested, dropping it",
                            close_grace.as_secs()
                        ));
                        break;
                    }
                    closing = true;
                    conn.as_mut().graceful_shutdown();
                    deadline.as_mut().reset(Instant::now() + close_grace);
                }
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::InMemoryClientStore;

    fn state_with(keep_alive: u64, read: u64, write: u64) -> AppState {
        let mut config = Config::default();
        config.performance.keep_alive_timeout = keep_alive;
        config.performance.read_timeout = read;
        config.performance.write_timeout = write;
        AppState::new(config, Arc::new(InMemoryClientStore::new()))
    }

    #[test]
    fn test_keep_alive_connection_lives_for_keep_alive_timeout() {
        let state = state_with(75, 30, 30);
        assert_eq!(connection_lifetime(&state), Duration::from_secs(75));
    }

    #[test]
    fn test_single_exchange_connection_uses_larger_io_timeout() {
        let state = state_with(0, 10, 45);
        assert_eq!(connection_lifetime(&state), Duration::from_secs(45));
    }
}
