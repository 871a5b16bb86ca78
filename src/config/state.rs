// Application state module
// Shared runtime state handed to every connection

use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,

    /// Event streams currently being emitted
    pub active_streams: AtomicUsize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            active_streams: AtomicUsize::new(0),
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }

    /// Register a new stream, returning the number now active
    pub fn stream_opened(&self) -> usize {
        self.active_streams.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn stream_closed(&self) {
        self.active_streams.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn active_stream_count(&self) -> usize {
        self.active_streams.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_counting() {
        let cfg = Config::load_from("does-not-exist/sse-test-config").unwrap();
        let state = AppState::new(&cfg);
        assert!(state.access_log_enabled());

        assert_eq!(state.stream_opened(), 1);
        assert_eq!(state.stream_opened(), 2);
        state.stream_closed();
        assert_eq!(state.active_stream_count(), 1);
    }
}
