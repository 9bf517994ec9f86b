//! Best-effort session log file
//!
//! Each driver event becomes one line: `[<ISO timestamp>] <JSON>`.
//! Nothing in here ever returns an error to the caller.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::{LogCallback, LogLine};

/// Format a log line the way it is stored on disk (without the newline)
pub fn format_log_entry(at: DateTime<Utc>, line: &LogLine) -> serde_json::Result<String> {
    let json = serde_json::to_string(line)?;
    Ok(format!(
        "[{}] {}",
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
        json
    ))
}

/// Timestamp `line` and append it to `path`. Failures are discarded.
pub fn append_log(path: &Path, line: &LogLine) {
    if let Err(e) = try_append(path, line) {
        tracing::debug!(path = %path.display(), error = %e, "dropped log line");
    }
}

fn try_append(path: &Path, line: &LogLine) -> io::Result<()> {
    let entry = format_log_entry(Utc::now(), line)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", entry)
}

/// Log sink whose file is only known once the session id is issued.
///
/// Lines arriving before [`SessionLog::attach`] have nowhere to go and are dropped.
#[derive(Debug, Default)]
pub struct SessionLog {
    path: OnceLock<PathBuf>,
}

impl SessionLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Bind the sink to its file. Later calls are ignored.
    pub fn attach(&self, path: impl Into<PathBuf>) {
        let _ = self.path.set(path.into());
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.get().map(PathBuf::as_path)
    }

    pub fn record(&self, line: &LogLine) {
        match self.path.get() {
            Some(path) => append_log(path, line),
            None => tracing::debug!(line = %line.message, "log line before session start"),
        }
    }

    /// Callback to hand to the automation driver
    pub fn callback(self: &Arc<Self>) -> LogCallback {
        let sink = Arc::clone(self);
        Arc::new(move |line: &LogLine| sink.record(line))
    }
}
