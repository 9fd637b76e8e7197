// Connection handling module
// Accepts one TCP connection and serves it on its own task

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};

use super::idle::IdleStream;
use crate::config::{AppState, PerformanceConfig};
use crate::handler;
use crate::logger;

/// Accept a connection unless the site is at its connection limit.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - State of the site that accepted the connection
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    // Increment first, then check the limit so concurrent accepts cannot both slip in
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "[{}] Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected.",
                state.site.name()
            ));
            drop(stream);
            return;
        }
    }

    logger::log_debug(&format!(
        "[{}] Accepted connection from {peer_addr}",
        state.site.name()
    ));

    handle_connection(stream, peer_addr, Arc::clone(state));
}

/// Serve a single connection on a tracked task.
///
/// `read_timeout` bounds reading each request head. Once a request is being
/// answered the connection only ends early when no bytes move for
/// [`idle_timeout`], so slow but steady downloads run to completion.
fn handle_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    let tracker = state.connections.clone();
    tracker.spawn(async move {
        let perf = &state.config.performance;
        let idle_limit = idle_timeout(perf);
        let (stream, activity) = IdleStream::new(stream);
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.timer(TokioTimer::new());
        builder.keep_alive(perf.keep_alive_timeout > 0);
        if perf.read_timeout > 0 {
            builder.header_read_timeout(Duration::from_secs(perf.read_timeout));
        }

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, peer_addr, Arc::clone(&service_state))
            }),
        );

        let idle = async {
            match idle_limit {
                Some(limit) => activity.idle(limit).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            result = conn => {
                if let Err(err) = result {
                    logger::log_connection_error(&err);
                }
            }
            () = idle => {
                logger::log_warning(&format!(
                    "[{}] Connection from {peer_addr} idle for {} seconds, closing",
                    state.site.name(),
                    idle_limit.map_or(0, |d| d.as_secs())
                ));
            }
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}

/// How long a connection may go without moving a byte
///
/// Covers a stalled reader during a response (`write_timeout`) and the wait
/// for the next request on a kept-alive connection (`keep_alive_timeout`).
/// `None` when every timeout is disabled.
pub fn idle_timeout(perf: &PerformanceConfig) -> Option<Duration> {
    let secs = perf
        .read_timeout
        .max(perf.write_timeout)
        .max(perf.keep_alive_timeout);
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_idle_timeout_takes_longest_limit() {
        let mut perf = Config::load_from("this-config-file-does-not-exist")
            .unwrap()
            .performance;
        assert_eq!(idle_timeout(&perf), Some(Duration::from_secs(75)));

        perf.keep_alive_timeout = 0;
        perf.read_timeout = 5;
        perf.write_timeout = 12;
        assert_eq!(idle_timeout(&perf), Some(Duration::from_secs(12)));

        perf.read_timeout = 0;
        perf.write_timeout = 0;
        assert_eq!(idle_timeout(&perf), None);
    }
}
