// Startup error types
// Anything in here stops the process before a socket is bound

use thiserror::Error;

use crate::model::ProviderError;

/// Errors that prevent the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0} environment variable not set; the server cannot start without a model credential")]
    MissingCredential(&'static str),

    #[error("invalid listen address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error("failed to create model client: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
