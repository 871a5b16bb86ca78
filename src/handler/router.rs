//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! matching, and access logging.

use crate::config::AppState;
use crate::handler::{events, page};
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry, AccessLogFormat};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub const EVENTS_PATH: &str = "/events";
pub const PAGE_PATH: &str = "/";

/// Where a path leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    TestPage,
    EventStream,
    NotFound,
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        match path {
            PAGE_PATH => Self::TestPage,
            EVENTS_PATH => Self::EventStream,
            _ => Self::NotFound,
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Request bodies are never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    logger::log_request(req.method(), req.uri(), req.version());

    let response = dispatch(&req, &state);

    if state.access_log_enabled() {
        let entry = access_entry(&req, &response, peer_addr, started);
        logger::log_access(
            &entry,
            &AccessLogFormat::parse(&state.config.logging.access_log_format),
        );
    }

    Ok(response)
}

fn dispatch<B>(req: &Request<B>, state: &Arc<AppState>) -> Response<ResponseBody> {
    let server_name = state.config.http.server_name.as_str();
    let is_head = match *req.method() {
        Method::GET => false,
        Method::HEAD => true,
        Method::OPTIONS => {
            return http::build_options_response(server_name, state.config.http.enable_cors)
        }
        ref other => {
            logger::log_warning(&format!("Method not allowed: {other}"));
            return http::build_405_response(server_name);
        }
    };

    match Route::resolve(req.uri().path()) {
        Route::TestPage => page::serve_test_page(server_name, is_head),
        // HEAD gets the stream headers without starting an emitter
        Route::EventStream if is_head => {
            http::build_event_stream_response(
                server_name,
                http::empty_body(),
                state.config.performance.keep_alive,
            )
        }
        Route::EventStream => events::serve_event_stream(state),
        Route::NotFound => http::build_404_response(server_name, is_head),
    }
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<ResponseBody>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn test_state() -> Arc<AppState> {
        let mut cfg = Config::load_from("does-not-exist/sse-test-config").unwrap();
        cfg.stream.interval_ms = 0;
        cfg.logging.access_log = false;
        Arc::new(AppState::new(&cfg))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn send(method: Method, path: &str) -> Response<ResponseBody> {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(())
            .unwrap();
        handle_request(req, test_state(), peer()).await.unwrap()
    }

    async fn body_string(response: Response<ResponseBody>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_route_resolve() {
        assert_eq!(Route::resolve("/"), Route::TestPage);
        assert_eq!(Route::resolve("/events"), Route::EventStream);
        assert_eq!(Route::resolve("/events/"), Route::NotFound);
        assert_eq!(Route::resolve("/foo"), Route::NotFound);
    }

    #[tokio::test]
    async fn test_page_served() {
        let response = send(Method::GET, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["Content-Type"]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let html = body_string(response).await;
        assert!(html.contains("new EventSource('/events')"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let response = send(Method::GET, "/foo").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["Content-Type"], "text/plain");
        assert_eq!(body_string(response).await, "Not Found");
    }

    #[tokio::test]
    async fn test_query_string_ignored_for_routing() {
        let response = send(Method::GET, "/?tab=1").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_events_stream() {
        let response = send(Method::GET, "/events").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Type"], "text/event-stream");
        let body = body_string(response).await;
        assert!(body.starts_with("event: message\nid: 1\n"));
        assert!(body.ends_with(": heartbeat\n\n"));
    }

    #[tokio::test]
    async fn test_head_events_has_headers_only() {
        let response = send(Method::HEAD, "/events").await;
        assert_eq!(response.headers()["Content-Type"], "text/event-stream");
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_methods() {
        let response = send(Method::POST, "/events").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["Allow"], "GET, HEAD, OPTIONS");

        let response = send(Method::OPTIONS, "/events").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/foo?x=1")
            .version(Version::HTTP_10)
            .header("User-Agent", "curl/8.5.0")
            .body(())
            .unwrap();
        let response = http::build_404_response("test", false);

        let entry = access_entry(&req, &response, peer(), Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1:40000");
        assert_eq!(entry.path, "/foo");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.http_version, "1.0");
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, Some(9));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.5.0"));
        assert_eq!(entry.referer, None);
    }
}
