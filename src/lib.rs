//! aicerts-web-agent - AI browser agent runs on Browserbase
//!
//! Starts a remote browser session, hands a natural-language instruction to
//! a Stagehand agent running in it, and records the session to disk.
//!
//! # Architecture
//!
//! - **Core**: Configuration, error handling, and record types
//! - **Output**: Start/result JSON records and the session log file
//! - **Remote**: Browserbase and Stagehand clients behind traits
//! - **Agent**: The session orchestrator
//! - **CLI**: Command-line arguments
//!
//! # Usage
//!
//! ```rust,no_run
//! use aicerts_web_agent::RunOptions;
//!
//! #[tokio::main]
//! async fn main() {
//!     let options = RunOptions::default();
//!     let outcome = aicerts_web_agent::run("Find today's top story on example.com", &options)
//!         .await
//!         .unwrap();
//!     println!("{}", outcome.result.message);
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod logging;
pub mod output;
pub mod remote;

// Re-export commonly used items
pub use agent::{run, RunOutcome, SessionRunner};
pub use core::{Result, RunConfig, RunOptions, WebAgentError};
