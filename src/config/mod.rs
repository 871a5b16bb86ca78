// Configuration module entry point
// Loads layered configuration and holds shared runtime state

mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StreamConfig,
};

/// Configuration file looked up next to the working directory (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Prefix for environment overrides, e.g. `SSE_SERVER_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "SSE_SERVER";

impl Config {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (extension optional)
    /// A missing file is not an error: defaults and environment still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "localhost")?
            .set_default("server.port", 8888)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.server_name", "sse-test-server")?
            .set_default("http.enable_cors", false)?
            .set_default("stream.interval_ms", 1000)?
            .set_default("stream.channel_capacity", 16)?
            .build()?;

        settings.try_deserialize()
    }

    /// Resolve `server.host:server.port`, preferring IPv4 (so `localhost` binds 127.0.0.1)
    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        let resolved: Vec<SocketAddr> = addr
            .to_socket_addrs()
            .map_err(|e| ServerError::Address {
                addr: addr.clone(),
                reason: e.to_string(),
            })?
            .collect();

        resolved
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| resolved.first())
            .copied()
            .ok_or_else(|| ServerError::Address {
                addr,
                reason: "host resolved to no addresses".to_string(),
            })
    }

    /// Base URL as users should type it
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.server.host, self.server.port)
    }
}
