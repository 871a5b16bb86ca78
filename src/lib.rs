//! Server-Sent Events test server
//!
//! Serves a fixed sequence of SSE events on `/events` and a browser test page on `/`,
//! for exercising SSE clients by hand or from tests.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod sse;
