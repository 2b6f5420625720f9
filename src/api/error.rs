// API error module
// Per-request failures and their mapping to status codes and fixed public messages

use hyper::StatusCode;
use std::fmt;
use thiserror::Error;

use crate::model::ProviderError;
use crate::schema::SchemaViolation;

/// Which model-backed operation a request was performing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Analysis,
    Suggestion,
}

impl Operation {
    const fn provider_failure_message(self) -> &'static str {
        match self {
            Self::Analysis => "Internal Server Error during AI analysis.",
            Self::Suggestion => "Internal Server Error during suggestion generation.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analysis => f.write_str("task analysis"),
            Self::Suggestion => f.write_str("suggestion generation"),
        }
    }
}

/// Errors raised while handling an API request
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(u64),

    #[error("required field `{0}` missing or empty")]
    MissingField(&'static str),

    #[error("model output rejected: {0}")]
    ModelOutput(#[from] SchemaViolation),

    #[error("{operation} failed: {source}")]
    Provider {
        operation: Operation,
        #[source]
        source: ProviderError,
    },
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) | Self::MissingField(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ModelOutput(_) | Self::Provider { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to callers; diagnostic detail stays in the logs
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidBody(_) => "Invalid JSON body".to_string(),
            Self::PayloadTooLarge(_) => "Request body too large".to_string(),
            Self::MissingField(field) => format!("Missing {field}"),
            Self::ModelOutput(_) => "AI returned invalid JSON structure.".to_string(),
            Self::Provider { operation, .. } => operation.provider_failure_message().to_string(),
        }
    }
}
