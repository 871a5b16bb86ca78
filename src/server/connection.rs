// Connection handling module
// Accepts a TCP connection and serves it with hyper's HTTP/1 driver

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
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
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    // Event blocks are small; send each one as soon as it is written
    if let Err(e) = stream.set_nodelay(true) {
        logger::log_warning(&format!("Failed to set TCP_NODELAY for {peer_addr}: {e}"));
    }

    serve_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
    );
}

/// Serve a single connection in a spawned task.
///
/// Only the request head is bounded by `read_timeout`; a response body may
/// run as long as its stream lasts. The counter is decremented when it ends.
fn serve_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let socket = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(state.config.performance.header_read_timeout())
            .keep_alive(state.config.performance.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            socket,
            service_fn(move |req| {
                handler::handle_request(req, Arc::clone(&service_state), peer_addr)
            }),
        );

        if let Err(err) = conn.await {
            if is_client_disconnect(&err) {
                logger::log_client_disconnect(&peer_addr);
            } else if err.is_timeout() {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} sent no request head within {} seconds",
                    state.config.performance.read_timeout
                ));
            } else {
                logger::log_connection_error(&err);
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Peer went away: a closed or reset socket, or a request cut short
fn is_client_disconnect(err: &hyper::Error) -> bool {
    err.is_incomplete_message() || err.is_canceled() || caused_by_disconnect(err)
}

/// Walk the source chain looking for an I/O error caused by the peer closing
fn caused_by_disconnect(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("error writing a body to connection")]
    struct BodyWrite(#[source] io::Error);

    #[test]
    fn test_peer_close_is_disconnect() {
        for kind in [
            io::ErrorKind::BrokenPipe,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
        ] {
            assert!(caused_by_disconnect(&io::Error::from(kind)), "{kind:?}");
        }
    }

    #[test]
    fn test_disconnect_found_through_source_chain() {
        let err = BodyWrite(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(caused_by_disconnect(&err));
    }

    #[test]
    fn test_other_failures_are_not_disconnects() {
        let err = BodyWrite(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!caused_by_disconnect(&err));
        assert!(!caused_by_disconnect(&io::Error::other("bad state")));
    }
}
