// Browser test page: opens an EventSource on /events and lists what arrives

use crate::http::{self, ResponseBody};
use hyper::Response;

pub const TEST_PAGE: &str = include_str!("page.html");

/// Serve the test page
pub fn serve_test_page(server_name: &str, is_head: bool) -> Response<ResponseBody> {
    http::build_html_response(server_name, TEST_PAGE, is_head)
}
