//! Replay module - the changelog state machine.
//!
//! Pure and synchronous: replaying one issue never touches another, so
//! callers may fan issues out across threads freely.

mod engine;

pub use engine::{extract_status_events, ReplayEngine, ReplayError};
