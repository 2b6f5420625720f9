// Connection handling module
// Accepts a single TCP connection and serves it on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::http;
use crate::logger;

/// Accept a connection, enforcing the connection limit.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    tracing::trace!("Accepted connection from {peer_addr}");
    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// Serve one connection in a spawned task
///
/// `connection_timeout` bounds the wait for each request's headers (idle
/// keep-alive included) and the handling of each request, not the life of
/// the connection.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let timeout_duration = Duration::from_secs(state.config.performance.connection_timeout);

        let mut builder = http1::Builder::new();
        builder
            .keep_alive(state.config.performance.keep_alive)
            .timer(TokioTimer::new())
            .header_read_timeout(timeout_duration);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move {
                    let handling = handler::handle_request(req, state, peer_addr);
                    match tokio::time::timeout(timeout_duration, handling).await {
                        Ok(result) => result,
                        Err(_) => {
                            logger::log_warning(&format!(
                                "Request from {peer_addr} timed out after {} seconds",
                                timeout_duration.as_secs()
                            ));
                            Ok::<_, Infallible>(http::build_504_response())
                        }
                    }
                }
            }),
        );

        match conn.await {
            Ok(()) => {}
            Err(err) if err.is_timeout() => {
                tracing::debug!("Connection from {peer_addr} closed after idle timeout");
            }
            Err(err) => logger::log_connection_error(&err),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
