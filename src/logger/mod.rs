//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Subscriber setup (stderr or a log file)
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Model and request failure logging
//!
//! Everything goes through `tracing`; access lines use the `access` target
//! so they can be filtered separately (`RUST_LOG=access=off`).

mod format;

pub use format::AccessLogEntry;

use std::fs::{File, OpenOptions};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LoggingConfig};
use crate::error::StartupError;

/// Initialize the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` takes
/// precedence over `logging.level`.
pub fn init(config: &LoggingConfig) -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| StartupError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.log_file.as_deref() {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    result.map_err(|e| StartupError::Logging(e.to_string()))
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> std::io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Server started, listening on http://{addr}");
    tracing::info!(
        model = %config.model.name,
        timeout_secs = config.model.timeout_secs,
        "Model provider configured"
    );
    tracing::info!(root = %config.assets.root, index = %config.assets.index_file, "Serving frontend assets");
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
    if let Some(ref path) = config.logging.log_file {
        tracing::info!("Log file: {path}");
    }
}

pub fn log_shutdown(active_connections: usize) {
    tracing::info!("Shutdown requested, {active_connections} connection(s) still active");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_api_request(method: &str, path: &str, status: u16) {
    tracing::info!(target: "api", "{method} {path} - {status}");
}

/// Server-side detail for a failed API request; never sent to the client
pub fn log_api_failure(path: &str, status: u16, detail: &str) {
    if status >= 500 {
        tracing::error!(target: "api", "{path} failed with {status}: {detail}");
    } else {
        tracing::debug!(target: "api", "{path} rejected with {status}: {detail}");
    }
}

pub fn log_model_call(provider: &str, path: &str, elapsed_ms: u128) {
    tracing::debug!(target: "model", provider, "{path} model call finished in {elapsed_ms}ms");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
