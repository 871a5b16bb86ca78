//! Error types
//!
//! Client disconnects are not errors here: the emitter reports them as a
//! [`crate::handler::events::StreamOutcome`].

use thiserror::Error;

/// Failures while setting up or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {reason}")]
    Address { addr: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while emitting an event stream
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to serialize event payload: {0}")]
    Payload(#[from] serde_json::Error),
}
