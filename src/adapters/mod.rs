//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `transport` - HTTP transports (reqwest, scripted mock)
//! - `clock` - time sources (tokio, virtual)
//! - `tracker` - resilient executor and issue fetch strategies
//! - `export` - CSV/JSON files and text reports

pub mod clock;
pub mod export;
pub mod tracker;
pub mod transport;

pub use clock::{MockClock, SystemClock};
pub use export::FileMetricsStore;
pub use tracker::{
    ExecutorConfig, FailoverIssueSource, FetchEventCallback, NoOpEventCallback, OffsetSource,
    ResilientExecutor, TokenCursorSource, TrackerEndpoints,
};
pub use transport::{MockTransport, ReqwestTransport, ReqwestTransportConfig};
