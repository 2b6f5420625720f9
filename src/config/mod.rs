// Configuration module entry point
// Loads layered configuration and holds the per-process application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::{
    AssetsConfig, Config, HttpConfig, LoggingConfig, ModelConfig, PerformanceConfig, ServerConfig,
};

/// Environment variable holding the model provider credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable pointing at the config file (without extension)
const CONFIG_PATH_ENV: &str = "TASKLENS_CONFIG";

/// Well-known environment variables that take precedence over every other source
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT").ok(),
            api_key: std::env::var(API_KEY_ENV).ok(),
            model: std::env::var("GEMINI_MODEL").ok(),
        }
    }
}

impl Config {
    /// Load configuration from `TASKLENS_CONFIG` or "config" (toml, optional)
    pub fn load() -> Result<Self, StartupError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config".to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, StartupError> {
        Self::load_with(config_path, &EnvOverrides::from_env())
    }

    /// Build configuration from defaults, the optional file, `TASKLENS__*`
    /// variables and finally the well-known overrides, then validate it.
    pub fn load_with(config_path: &str, overrides: &EnvOverrides) -> Result<Self, StartupError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("TASKLENS").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 120)?
            .set_default("http.server_name", "tasklens")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("assets.root", "static")?
            .set_default("assets.index_file", "index.html")?
            .set_default("model.name", "gemini-2.5-flash")?
            .set_default(
                "model.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("model.timeout_secs", 60)?
            .set_override_option("server.port", overrides.port.clone())?
            .set_override_option("model.api_key", overrides.api_key.clone())?
            .set_override_option("model.name", overrides.model.clone())?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), StartupError> {
        if self.model.api_key.trim().is_empty() {
            return Err(StartupError::MissingCredential(API_KEY_ENV));
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|e: std::net::AddrParseError| StartupError::InvalidAddress {
            reason: e.to_string(),
            addr,
        })
    }
}

/// Configuration with test-friendly values and no file or environment lookups
#[cfg(test)]
pub fn test_config(assets_root: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            access_log: true,
            access_log_format: "combined".to_string(),
            log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive: true,
            connection_timeout: 5,
            max_connections: None,
        },
        http: HttpConfig {
            server_name: "tasklens-test".to_string(),
            enable_cors: true,
            max_body_size: 1024,
        },
        assets: AssetsConfig {
            root: assets_root.to_string(),
            index_file: "index.html".to_string(),
        },
        model: ModelConfig {
            api_key: "test-key".to_string(),
            name: "gemini-test".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 5,
        },
    }
}
