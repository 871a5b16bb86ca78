//! Server-Sent Events protocol layer
//!
//! Event model and encoder, an incremental decoder, and the demo sequence
//! the server emits.

pub mod event;
pub mod parser;
pub mod script;

pub use event::SseEvent;
pub use parser::{parse_stream, SseParser};
pub use script::{demo_script, DemoStep};
