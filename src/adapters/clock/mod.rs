//! Clock adapters: real tokio time and a virtual clock for tests.

mod mock_clock;
mod system_clock;

pub use mock_clock::MockClock;
pub use system_clock::SystemClock;
