//! The configured set of statuses counted as cycle time.

use std::collections::BTreeSet;

use crate::domain::foundation::ValidationError;

/// Status names that count toward cycle time. Matching is exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStatusSet(BTreeSet<String>);

impl CycleStatusSet {
    /// Builds a set, ignoring blank names.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` if no non-blank status remains.
    pub fn new<I, S>(statuses: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = statuses
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if set.is_empty() {
            return Err(ValidationError::empty_field("cycle_statuses"));
        }
        Ok(Self(set))
    }

    /// Returns true if `status` is present and counted as cycle time.
    pub fn contains(&self, status: Option<&str>) -> bool {
        status.is_some_and(|s| self.0.contains(s))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
