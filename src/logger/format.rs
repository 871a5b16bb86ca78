//! Log line formatting
//!
//! Access log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - any other string is a custom pattern with `$variables`
//!
//! Stream progress lines use the `dd/Mon/YYYY HH:MM:SS - message` shape.

use chrono::{DateTime, Local};

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";
const STREAM_TIME: &str = "%d/%b/%Y %H:%M:%S";

/// Parsed `logging.access_log_format`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessLogFormat {
    Combined,
    Common,
    Json,
    Custom(String),
}

impl AccessLogFormat {
    pub fn parse(format: &str) -> Self {
        match format {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            custom => Self::Custom(custom.to_string()),
        }
    }
}

/// Access log entry for one request/response pair
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    /// Body size; `None` for streamed bodies whose size is unknown when logged
    pub body_bytes: Option<usize>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Time to produce the response head, in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: None,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn render(&self, format: &AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.render_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessLogFormat::Common => self.render_common(),
            AccessLogFormat::Json => self.render_json(),
            AccessLogFormat::Custom(pattern) => self.render_custom(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    fn body_bytes_str(&self) -> String {
        self.body_bytes
            .map_or_else(|| "-".to_string(), |n| n.to_string())
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn render_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes_str(),
        )
    }

    fn render_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$request_time`, `$status`, `$body_bytes_sent`,
    /// `$http_referer`, `$http_user_agent`
    fn render_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // Longer names first: $request_time and $request_uri before $request
        let substitutions = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{request_time:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes_str()),
            ("$http_referer", self.referer.clone().unwrap_or_else(|| "-".into())),
            ("$http_user_agent", self.user_agent.clone().unwrap_or_else(|| "-".into())),
        ];

        substitutions
            .iter()
            .fold(pattern.to_string(), |acc, (var, value)| acc.replace(var, value))
    }
}

/// Stream progress line, timestamped like a classic HTTP server log
pub fn stream_line(time: &DateTime<Local>, message: &str) -> String {
    format!("{} - {message}", time.format(STREAM_TIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "127.0.0.1:52100".to_string(),
            "GET".to_string(),
            "/events".to_string(),
        );
        entry.query = Some("client=curl".to_string());
        entry.status = 200;
        entry.referer = Some("http://localhost:8888/".to_string());
        entry.user_agent = Some("curl/8.5.0".to_string());
        entry.request_time_us = 12_000;
        entry
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(AccessLogFormat::parse("combined"), AccessLogFormat::Combined);
        assert_eq!(AccessLogFormat::parse("json"), AccessLogFormat::Json);
        assert_eq!(
            AccessLogFormat::parse("$status"),
            AccessLogFormat::Custom("$status".to_string())
        );
    }

    #[test]
    fn test_format_combined_streamed_body() {
        let log = create_test_entry().render(&AccessLogFormat::Combined);
        assert!(log.starts_with("127.0.0.1:52100 - - ["));
        assert!(log.contains("\"GET /events?client=curl HTTP/1.1\" 200 -"));
        assert!(log.ends_with("\"http://localhost:8888/\" \"curl/8.5.0\""));
    }

    #[test]
    fn test_format_common_with_size() {
        let mut entry = create_test_entry();
        entry.status = 404;
        entry.body_bytes = Some(9);
        let log = entry.render(&AccessLogFormat::Common);
        assert!(log.ends_with("\"GET /events?client=curl HTTP/1.1\" 404 9"));
        assert!(!log.contains("curl/8.5.0"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().render(&AccessLogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["path"], "/events");
        assert_eq!(value["status"], 200);
        assert!(value["body_bytes"].is_null());
        assert_eq!(value["user_agent"], "curl/8.5.0");
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry()
            .render(&AccessLogFormat::parse("$request_method $request_uri $status $request_time"));
        assert_eq!(log, "GET /events?client=curl 200 0.012");
    }

    #[test]
    fn test_stream_line() {
        use chrono::TimeZone;

        let time = Local.with_ymd_and_hms(2026, 10, 16, 9, 5, 3).unwrap();
        assert_eq!(
            stream_line(&time, "SSE client connected"),
            "16/Oct/2026 09:05:03 - SSE client connected"
        );
    }
}
