// Application state module
// Holds what every request handler needs; built once at startup and shared read-only

use std::sync::Arc;

use super::types::Config;
use crate::model::ModelProvider;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Model capability shared by all requests
    pub provider: Arc<dyn ModelProvider>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn ModelProvider>) -> Self {
        Self { config, provider }
    }
}
