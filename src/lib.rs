//! Cycle Time Metrics - issue tracker cycle time extraction
//!
//! Fetches issues with their changelogs from the tracker, replays each
//! status history to measure time spent in configured "active" statuses,
//! and exports per-issue metrics for analysis.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
