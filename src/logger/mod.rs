//! Logger module
//!
//! Provides logging utilities for the SSE server including:
//! - Server lifecycle logging
//! - Event stream progress logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{stream_line, AccessLogEntry, AccessLogFormat};
pub use writer::Level;

use crate::config::Config;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        Level::parse(&config.logging.level),
    )
}

/// Route a line through the global writer, or straight to stdout/stderr before `init()`
fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level <= Level::Warn => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let base = config.base_url();
    write(Level::Info, &format!("SSE test server started: {base}"));
    write(Level::Info, &format!("Bound to: {addr}"));
    write(Level::Info, "");
    write(Level::Info, &format!("SSE endpoint: {base}/events"));
    write(Level::Info, &format!("Web UI: {base}/"));
    write(Level::Info, "");
    write(Level::Info, "Test from another terminal:");
    write(Level::Info, &format!("  curl {base}/events"));
    write(Level::Info, "");
    if let Some(workers) = config.server.workers {
        write(Level::Info, &format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(Level::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(Level::Info, &format!("Error log: {path}"));
    }
    write(Level::Info, "Press Ctrl+C to stop server...");
}

pub fn log_server_stopped() {
    write(Level::Info, "\n\nServer stopped");
}

pub fn log_signal(name: &str) {
    write(Level::Info, &format!("\n[SIGNAL] {name} received, shutting down"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(Level::Debug, &format!("[Connection] Accepted from: {peer_addr}"));
}

/// Peer closed the socket mid-response; expected when a browser tab goes away
pub fn log_client_disconnect(peer_addr: &SocketAddr) {
    write(Level::Debug, &format!("[Connection] Client {peer_addr} disconnected"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(
        Level::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    write(Level::Debug, &format!("[Request] {method} {uri} {version:?}"));
}

/// Event stream progress, e.g. "Sent message 1"
pub fn log_stream(message: &str) {
    write(Level::Info, &stream_line(&chrono::Local::now(), message));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    let line = entry.render(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}
