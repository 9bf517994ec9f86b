//! CLI module - command-line surface
//!
//! Argument definitions and the conversion into run options.

pub mod args;

pub use args::Args;
