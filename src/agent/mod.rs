//! Agent module - session orchestration
//!
//! Runs one instruction on one remote browser session and records it.

pub mod orchestrator;
pub mod scope;

pub use orchestrator::{run, RunOutcome, SessionRunner};
pub use scope::SessionScope;
