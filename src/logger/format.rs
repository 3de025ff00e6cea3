//! Access log format module
//!
//! Supports `combined`, `common`, `json`, and custom `$variable` patterns.

use chrono::Local;
use hyper::header::{HeaderMap, HeaderName, REFERER, USER_AGENT};
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;
use std::time::Instant;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served request, ready to be written to the access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Start an entry for an incoming request; status and size are filled by `finish`
    pub fn start(
        remote_addr: Option<SocketAddr>,
        method: &Method,
        uri: &Uri,
        version: Version,
        headers: &HeaderMap,
    ) -> Self {
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            remote_addr: remote_addr.map_or_else(|| "-".to_string(), |a| a.ip().to_string()),
            time: Local::now(),
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
            http_version: version_label(version).to_string(),
            status: 200,
            body_bytes: 0,
            referer: header(REFERER),
            user_agent: header(USER_AGENT),
            request_time_us: 0,
        }
    }

    /// Record the outcome of the request
    pub fn finish(&mut self, status: u16, body_bytes: usize, started: Instant) {
        self.status = status;
        self.body_bytes = body_bytes;
        self.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        let opt = |v: &Option<String>| {
            v.as_ref()
                .map_or_else(|| "null".to_string(), |s| format!("\"{}\"", escape_json(s)))
        };

        format!(
            r#"{{"remote_addr":"{}","time":"{}","method":"{}","path":"{}","query":{},"http_version":"{}","status":{},"body_bytes":{},"referer":{},"user_agent":{},"request_time_us":{}}}"#,
            escape_json(&self.remote_addr),
            self.time.to_rfc3339(),
            escape_json(&self.method),
            escape_json(&self.path),
            opt(&self.query),
            escape_json(&self.http_version),
            self.status,
            self.body_bytes,
            opt(&self.referer),
            opt(&self.user_agent),
            self.request_time_us,
        )
    }

    /// Custom format with `$variable` substitution
    ///
    /// Variables: `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$request_time`, `$status`,
    /// `$body_bytes_sent`, `$http_referer`, `$http_user_agent`.
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = format!("{:.3}", self.request_time_us as f64 / 1_000_000.0);

        // Longer names first: `$request_time` and friends before `$request`
        let substitutions = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", request_time),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$http_referer", self.referer.clone().unwrap_or_else(|| "-".to_string())),
            ("$http_user_agent", self.user_agent.clone().unwrap_or_else(|| "-".to_string())),
        ];

        substitutions
            .iter()
            .fold(pattern.to_string(), |acc, (var, value)| acc.replace(var, value))
    }
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_09 {
        "0.9"
    } else if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    }
}

fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, "https://example.com/view/Home".parse().unwrap());
        headers.insert(USER_AGENT, "Mozilla/5.0".parse().unwrap());

        let uri: Uri = "/save/Home?x=1".parse().unwrap();
        let mut entry = AccessLogEntry::start(
            Some("192.168.1.1:5000".parse().unwrap()),
            &Method::POST,
            &uri,
            Version::HTTP_11,
            &headers,
        );
        entry.status = 302;
        entry.body_bytes = 0;
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"POST /save/Home?x=1 HTTP/1.1\" 302 0"));
        assert!(log.ends_with("\"https://example.com/view/Home\" \"Mozilla/5.0\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("\"POST /save/Home?x=1 HTTP/1.1\" 302 0"));
        assert!(!log.contains("Mozilla"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        assert!(log.contains(r#""remote_addr":"192.168.1.1""#));
        assert!(log.contains(r#""method":"POST""#));
        assert!(log.contains(r#""query":"x=1""#));
        assert!(log.contains(r#""status":302"#));
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$request_method $request_uri $status $request_time");
        assert_eq!(log, "POST /save/Home?x=1 302 0.002");
    }

    #[test]
    fn test_missing_remote_addr_and_headers() {
        let uri: Uri = "/view/Home".parse().unwrap();
        let entry =
            AccessLogEntry::start(None, &Method::GET, &uri, Version::HTTP_10, &HeaderMap::new());
        let log = entry.format("combined");
        assert!(log.starts_with("- - - ["));
        assert!(log.contains("GET /view/Home HTTP/1.0"));
        assert!(log.ends_with("\"-\" \"-\""));
    }

    #[test]
    fn test_escape_json() {
        assert_eq!(escape_json("a\"b\\c\n"), "a\\\"b\\\\c\\n");
    }
}
