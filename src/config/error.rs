//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Tracker base URL must start with http:// or https://")]
    InvalidBaseUrl,

    #[error("Requests per minute must be greater than zero")]
    InvalidRateLimit,

    #[error("Max retries must be at least 1")]
    InvalidMaxRetries,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Page size must be between 1 and {max}")]
    InvalidPageSize { max: usize },

    #[error("At least one cycle time status is required")]
    NoCycleStatuses,
}
