//! HTTP protocol layer module
//!
//! Response types and builders, decoupled from routing and stream logic.

pub mod response;

use hyper::body::Bytes;
use std::convert::Infallible;

/// Body type of every response: fixed pages and live event streams alike
pub type ResponseBody = http_body_util::combinators::UnsyncBoxBody<Bytes, Infallible>;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_event_stream_response, build_html_response,
    build_options_response, empty_body, full_body,
};
