//! HTTP response building module
//!
//! Builders for every response the server sends. Bodies are boxed so fixed
//! pages and live event streams share one response type.

use super::ResponseBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

pub const NOT_FOUND_BODY: &str = "Not Found";
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Fixed body from bytes
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into()).boxed_unsync()
}

pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new().boxed_unsync()
}

/// Build 404 Not Found response
pub fn build_404_response(server_name: &str, is_head: bool) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Server", server_name)
        .header("Content-Type", "text/plain")
        .header("Content-Length", NOT_FOUND_BODY.len())
        .body(if is_head {
            empty_body()
        } else {
            full_body(NOT_FOUND_BODY)
        })
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(full_body(NOT_FOUND_BODY))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(server_name: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Server", server_name)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(full_body("Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(full_body("Method Not Allowed"))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(server_name: &str, enable_cors: bool) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Server", server_name)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Cache-Control, Last-Event-ID")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(empty_body()).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(empty_body())
    })
}

/// Build 200 HTML response
pub fn build_html_response(
    server_name: &str,
    content: &'static str,
    is_head: bool,
) -> Response<ResponseBody> {
    let body = if is_head {
        empty_body()
    } else {
        full_body(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Server", server_name)
        .header("Content-Type", HTML_CONTENT_TYPE)
        .header("Content-Length", content.len())
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(empty_body())
        })
}

/// Build 200 `text/event-stream` response around a streaming body
///
/// `Connection: keep-alive` is only advertised when the server keeps
/// connections open; otherwise hyper marks the response `Connection: close`.
pub fn build_event_stream_response(
    server_name: &str,
    body: ResponseBody,
    keep_alive: bool,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Server", server_name)
        .header("Content-Type", EVENT_STREAM_CONTENT_TYPE)
        .header("Cache-Control", "no-cache");

    if keep_alive {
        builder = builder.header("Connection", "keep-alive");
    }

    builder
        .header("Access-Control-Allow-Origin", "*")
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("event-stream", &e);
            Response::new(empty_body())
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(response: Response<ResponseBody>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_404_plain_text() {
        let response = build_404_response("test", false);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["Content-Type"], "text/plain");
        assert_eq!(body_string(response).await, "Not Found");
    }

    #[tokio::test]
    async fn test_404_head_has_no_body() {
        let response = build_404_response("test", true);
        assert_eq!(response.headers()["Content-Length"], "9");
        assert_eq!(body_string(response).await, "");
    }

    #[test]
    fn test_event_stream_headers() {
        let response = build_event_stream_response("test", empty_body(), true);
        let headers = response.headers();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(headers["Content-Type"], "text/event-stream");
        assert_eq!(headers["Cache-Control"], "no-cache");
        assert_eq!(headers["Connection"], "keep-alive");
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_event_stream_without_keep_alive() {
        let response = build_event_stream_response("test", empty_body(), false);
        assert!(!response.headers().contains_key("Connection"));
        assert_eq!(response.headers()["Content-Type"], "text/event-stream");
    }

    #[test]
    fn test_options_cors_toggle() {
        let plain = build_options_response("test", false);
        assert_eq!(plain.status(), StatusCode::NO_CONTENT);
        assert!(!plain.headers().contains_key("Access-Control-Allow-Origin"));

        let cors = build_options_response("test", true);
        assert_eq!(cors.headers()["Access-Control-Allow-Origin"], "*");
    }
}
