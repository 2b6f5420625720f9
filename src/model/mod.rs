//! Language model provider module
//!
//! The model is treated as an opaque capability: it takes a system
//! instruction plus user text and returns free-form text. Nothing here knows
//! about task schemas; callers validate whatever comes back.

mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// A single-turn prompt for the model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    /// System instruction, including any output format description
    pub system: String,
    /// Raw user content
    pub user: String,
    /// Sampling temperature; `None` leaves the provider default in place
    pub temperature: Option<f32>,
}

impl ModelRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: None,
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Failures of the model call itself (as opposed to bad model output)
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("model request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("model request failed: {0}")]
    Transport(String),

    #[error("model provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("model returned no text: {0}")]
    EmptyResponse(String),

    #[error("could not decode provider response: {0}")]
    Decode(String),
}

/// Text-in/text-out model capability
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Run one prompt and return the raw model text
    async fn generate(&self, request: &ModelRequest) -> Result<String, ProviderError>;
}

/// In-memory provider for handler tests
#[cfg(test)]
pub mod stub {
    use super::{async_trait, ModelProvider, ModelRequest, ProviderError};
    use std::sync::Mutex;

    pub struct StubProvider {
        reply: Result<String, String>,
        requests: Mutex<Vec<ModelRequest>>,
    }

    impl StubProvider {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Requests seen so far, oldest first
        pub fn requests(&self) -> Vec<ModelRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn generate(&self, request: &ModelRequest) -> Result<String, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(|message| ProviderError::Status {
                status: 503,
                message,
            })
        }
    }
}
