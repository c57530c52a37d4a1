//! Reqwest Transport - `HttpTransport` over a pooled reqwest client.
//!
//! Authenticates every request with HTTP basic auth (account + API token).
//!
//! # Configuration
//!
//! ```ignore
//! let config = ReqwestTransportConfig::new("me@example.com", api_token)
//!     .with_timeout(Duration::from_secs(30));
//!
//! let transport = ReqwestTransport::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::ports::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Configuration for the reqwest transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransportConfig {
    /// Account name for basic auth.
    pub username: String,
    /// API token for basic auth.
    api_token: Secret<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ReqwestTransportConfig {
    /// Creates a new configuration with the given credentials.
    pub fn new(username: impl Into<String>, api_token: Secret<String>) -> Self {
        Self {
            username: username.into(),
            api_token,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    config: ReqwestTransportConfig,
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(config: ReqwestTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }

    fn map_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .request(Self::method(request.method), &request.url)
            .basic_auth(&self.config.username, Some(self.config.api_token()))
            .header("Accept", "application/json")
            .query(&request.params)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.text().await.map_err(|e| self.map_error(e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
