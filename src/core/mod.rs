//! Core module - shared infrastructure
//!
//! Configuration resolution, error handling, and the record types written
//! to the output directory.

pub mod config;
pub mod error;
pub mod types;

pub use config::{Endpoints, Region, RunConfig, RunOptions};
pub use error::{Result, WebAgentError};
pub use types::*;
