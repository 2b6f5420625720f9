// Server module entry
// Accept loop, connection serving and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

pub use listener::create_reusable_listener;
pub use signal::shutdown_signal;

/// Accept connections until `shutdown` resolves
///
/// In-flight connections keep running on their own tasks; the loop only
/// stops taking new ones.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) -> std::io::Result<()> {
    let conn_counter = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                logger::log_shutdown(conn_counter.load(Ordering::SeqCst));
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer_addr)) => {
                    connection::accept_connection(stream, peer_addr, &state, &conn_counter);
                }
                Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
            },
        }
    }
}
