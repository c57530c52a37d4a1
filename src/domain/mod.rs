//! Domain layer containing the cycle time model and algorithms.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (timestamps, ids, errors)
//! - `issue` - Issue snapshots, status transitions, periods
//! - `replay` - Changelog replay state machine
//! - `metrics` - Flat per-issue output records
//! - `analysis` - Descriptive statistics and outlier removal

pub mod analysis;
pub mod foundation;
pub mod issue;
pub mod metrics;
pub mod replay;
