//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the cycle time domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{ParseError, ValidationError};
pub use ids::{IssueId, IssueKey};
pub use timestamp::Timestamp;
