//! Request handler module
//!
//! Routes requests to the event stream, the browser test page, or a 404.

pub mod events;
pub mod page;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
