// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::fmt;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub assets: AssetsConfig,
    pub model: ModelConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Log file path (optional, stderr if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Per-request bound in seconds, covering the header wait and the handling
    pub connection_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Frontend asset configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    /// Directory the frontend is served from
    pub root: String,
    /// File served for `/`
    pub index_file: String,
}

/// Language model provider configuration
#[derive(Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default)]
    pub api_key: String,
    pub name: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

// Keeps the credential out of debug output
impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
