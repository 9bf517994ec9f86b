//! JSON record files

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;

use crate::core::{Result, WebAgentError};

/// Paths of the files belonging to one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFiles {
    pub start: PathBuf,
    pub result: PathBuf,
    pub logs: PathBuf,
}

impl SessionFiles {
    pub fn new(dir: &Path, session_id: &str) -> Self {
        Self {
            start: dir.join(Self::start_name(session_id)),
            result: dir.join(Self::result_name(session_id)),
            logs: dir.join(format!("session-{session_id}-logs.txt")),
        }
    }

    pub fn start_name(session_id: &str) -> String {
        format!("session-{session_id}-start.json")
    }

    pub fn result_name(session_id: &str) -> String {
        format!("session-{session_id}-result.json")
    }
}

/// Write `content` as indented JSON to `dir/file_name`, creating `dir` if needed.
///
/// Existing files are overwritten. Returns the written path.
pub async fn write_record<T>(dir: &Path, file_name: &str, content: &T) -> Result<PathBuf>
where
    T: Serialize + ?Sized,
{
    fs::create_dir_all(dir)
        .await
        .map_err(|e| WebAgentError::output(dir, e))?;

    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(content)?;
    fs::write(&path, json)
        .await
        .map_err(|e| WebAgentError::output(&path, e))?;

    tracing::debug!(path = %path.display(), "wrote record");
    Ok(path)
}
