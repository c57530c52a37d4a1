//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CYCLE_METRICS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use cycle_time_metrics::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Fetching from {}", config.tracker.base_url);
//! ```

mod cycle;
mod error;
mod fetch;
mod query;
mod tracker;

pub use cycle::{parse_status_list, CycleConfig, DEFAULT_CYCLE_STATUSES};
pub use error::{ConfigError, ValidationError};
pub use fetch::{FetchConfig, MAX_PAGE_SIZE};
pub use query::{QueryConfig, QueryPreset};
pub use tracker::TrackerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Tracker URL and credentials
    pub tracker: TrackerConfig,

    /// Pacing, retries, and limits
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Statuses counted as cycle time
    #[serde(default)]
    pub cycle: CycleConfig,

    /// Default query settings
    #[serde(default)]
    pub query: QueryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present
    /// 2. Reads environment variables with `CYCLE_METRICS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CYCLE_METRICS__TRACKER__BASE_URL=https://acme.atlassian.net` -> `tracker.base_url`
    /// - `CYCLE_METRICS__FETCH__REQUESTS_PER_MINUTE=30` -> `fetch.requests_per_minute = 30`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CYCLE_METRICS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.tracker.validate()?;
        self.fetch.validate()?;
        self.cycle.validate()?;
        Ok(())
    }
}
