//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `HttpTransport` - one raw HTTP exchange with the tracker
//! - `Clock` - monotonic time and sleeping (pacing, backoff)
//! - `IssueSource` - a strategy for fetching issue snapshots
//! - `MetricsStore` - saving and loading metric files

mod clock;
mod http_transport;
mod issue_source;
mod metrics_store;

pub use clock::Clock;
pub use http_transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use issue_source::{FetchError, IssueQuery, IssueSource};
pub use metrics_store::{ExportError, MetricsStore};
