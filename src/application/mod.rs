//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    AnalyzeCycleTimesCommand, AnalyzeCycleTimesError, AnalyzeCycleTimesHandler,
    ExtractMetricsCommand, ExtractMetricsError, ExtractMetricsHandler, ExtractMetricsResult,
};
