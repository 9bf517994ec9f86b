//! Output module - session records on disk
//!
//! Start and result records are JSON files whose write errors propagate.
//! Driver log lines go to a per-session text file on a best-effort basis.

mod records;
mod session_log;

pub use records::{write_record, SessionFiles};
pub use session_log::{append_log, format_log_entry, SessionLog};
