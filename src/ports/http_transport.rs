//! HTTP Transport Port - a single, unretried HTTP exchange.
//!
//! The resilient executor layers pacing and retries on top of this port, so
//! implementations must not retry on their own. Any HTTP status is a
//! successful exchange; only failures to get a response at all are errors.

use async_trait::async_trait;
use std::fmt;

/// Port for issuing one HTTP request.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns whatever the server answered.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// HTTP methods used against the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An outgoing request: method, absolute URL, and query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a GET request with no parameters.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            params: Vec::new(),
        }
    }

    /// Adds a query parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Returns the first value of a query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A received response. Headers are kept with their original names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, reset, etc.
    #[error("connection failed: {0}")]
    Connect(String),

    /// No response within the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Any other failure while sending or reading the body.
    #[error("transport error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_collects_params() {
        let request = HttpRequest::get("https://tracker.example.com/rest/api/3/search")
            .with_param("jql", "project = TAS")
            .with_param("maxResults", 50);

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.param("jql"), Some("project = TAS"));
        assert_eq!(request.param("maxResults"), Some("50"));
        assert_eq!(request.param("startAt"), None);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse::new(429, "").with_header("Retry-After", "30");
        assert_eq!(response.header("retry-after"), Some("30"));
        assert!(!response.is_success());
    }

    #[test]
    fn method_displays_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
    }
}
