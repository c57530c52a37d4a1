//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while reading tracker-provided values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unparseable timestamp '{input}'")]
    InvalidTimestamp { input: String },
}

impl ParseError {
    /// Creates an invalid timestamp error.
    pub fn invalid_timestamp(input: impl Into<String>) -> Self {
        ParseError::InvalidTimestamp {
            input: input.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("cycle_statuses");
        assert_eq!(format!("{}", err), "Field 'cycle_statuses' cannot be empty");
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("status", "blank name");
        assert_eq!(
            format!("{}", err),
            "Field 'status' has invalid format: blank name"
        );
    }

    #[test]
    fn parse_error_names_the_input() {
        let err = ParseError::invalid_timestamp("yesterday");
        assert_eq!(format!("{}", err), "unparseable timestamp 'yesterday'");
    }
}
