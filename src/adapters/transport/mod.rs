//! HTTP transport adapters.
//!
//! - `ReqwestTransport` - production client with basic auth and timeouts
//! - `MockTransport` - scripted replies for tests

mod mock_transport;
mod reqwest_transport;

pub use mock_transport::{MockReply, MockTransport};
pub use reqwest_transport::{ReqwestTransport, ReqwestTransportConfig};
