// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub stream: StreamConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads (CPU cores when unset)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Reuse connections for further requests (HTTP/1.1 keep-alive)
    pub keep_alive: bool,
    /// Seconds allowed to receive a request head; 0 disables the limit.
    /// Response bodies, including event streams, are not bounded by it.
    pub read_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

impl PerformanceConfig {
    pub const fn header_read_timeout(&self) -> Option<Duration> {
        if self.read_timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(self.read_timeout))
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    /// Add CORS headers to OPTIONS replies
    pub enable_cors: bool,
}

/// Event stream pacing
#[derive(Debug, Deserialize, Clone)]
pub struct StreamConfig {
    /// Pause after every emitted step, in milliseconds
    pub interval_ms: u64,
    /// Chunks buffered between the emitter and the connection
    pub channel_capacity: usize,
}

impl StreamConfig {
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
