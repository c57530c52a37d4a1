//! Tracker connection configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Where the tracker lives and how to authenticate
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Base URL, e.g. `https://acme.atlassian.net`
    pub base_url: String,

    /// Account the API token belongs to
    pub username: String,

    /// API token, sent with basic auth
    pub api_token: Secret<String>,
}

impl TrackerConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            api_token: Secret::new(api_token.into()),
        }
    }

    /// Validate tracker configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TRACKER__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TRACKER__USERNAME"));
        }
        if self.api_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("TRACKER__API_TOKEN"));
        }
        Ok(())
    }
}
