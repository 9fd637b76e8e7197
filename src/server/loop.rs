// Server loop module
// Accepts connections for one site until shutdown is requested, then lets
// in-flight connections finish

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Accept loop for one site.
///
/// After shutdown is signalled the listener is closed and the call returns
/// once every accepted connection has finished, or after
/// `performance.shutdown_timeout` seconds.
pub async fn run_site(listener: TcpListener, state: Arc<AppState>, signals: Arc<SignalHandler>) {
    let shutdown = signals.shutdown.notified();
    tokio::pin!(shutdown);
    // Register interest before checking the flag so a concurrent notify is not lost
    shutdown.as_mut().enable();

    logger::log_site_start(&state.site);

    loop {
        if signals.shutdown_requested.load(Ordering::SeqCst) {
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!(
                        "[{}] Failed to accept connection: {e}",
                        state.site.name()
                    )),
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_info(&format!(
        "[{}] Stopped accepting connections ({} still active)",
        state.site.name(),
        state.active_connections.load(Ordering::SeqCst)
    ));

    drain_connections(&state).await;
}

async fn drain_connections(state: &AppState) {
    state.connections.close();
    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);

    if tokio::time::timeout(grace, state.connections.wait()).await.is_err() {
        logger::log_warning(&format!(
            "[{}] {} connections still open after {} seconds, closing",
            state.site.name(),
            state.active_connections.load(Ordering::SeqCst),
            grace.as_secs()
        ));
    }
}
