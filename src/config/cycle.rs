//! Cycle time status configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::issue::CycleStatusSet;

/// Statuses counted as cycle time unless configured otherwise
pub const DEFAULT_CYCLE_STATUSES: &str = "Doing,Blocked,Review,In Progress,In Review";

/// Which workflow statuses count toward cycle time
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CycleConfig {
    /// Comma-separated status names, matched exactly
    #[serde(default = "default_statuses")]
    pub statuses: String,
}

impl CycleConfig {
    pub fn new(statuses: impl Into<String>) -> Self {
        Self {
            statuses: statuses.into(),
        }
    }

    /// Status names in configured order, trimmed, blanks dropped
    pub fn status_list(&self) -> Vec<String> {
        parse_status_list(&self.statuses)
    }

    /// Builds the domain status set
    pub fn status_set(&self) -> Result<CycleStatusSet, ValidationError> {
        CycleStatusSet::new(self.status_list()).map_err(|_| ValidationError::NoCycleStatuses)
    }

    /// Validate cycle configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.status_set().map(|_| ())
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            statuses: default_statuses(),
        }
    }
}

/// Splits a comma-separated status list
pub fn parse_status_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_statuses() -> String {
    DEFAULT_CYCLE_STATUSES.to_string()
}
