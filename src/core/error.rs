//! Error types for the web agent
//!
//! One error enum covers configuration, remote services, and output files.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for web agent operations
#[derive(Error, Debug)]
pub enum WebAgentError {
    /// A required setting was given neither as a flag nor in the environment
    #[error("Missing required setting: pass --{flag} or set {env}")]
    MissingSetting {
        flag: &'static str,
        env: &'static str,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The automation service refused to start a session
    #[error("Session initialization failed: {0}")]
    SessionInit(String),

    /// Browserbase or Stagehand API errors
    #[error("Remote service error: {0}")]
    Remote(String),

    /// The agent run itself failed
    #[error("Agent execution failed: {0}")]
    Agent(String),

    /// A start or result record could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A background task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Convenience Result type for web agent operations
pub type Result<T> = std::result::Result<T, WebAgentError>;

impl WebAgentError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a session initialization error
    pub fn session_init(msg: impl Into<String>) -> Self {
        Self::SessionInit(msg.into())
    }

    /// Create a remote service error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create an agent execution error
    pub fn agent(msg: impl Into<String>) -> Self {
        Self::Agent(msg.into())
    }

    /// Wrap an IO error with the path it happened on
    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }

    /// Whether this error was raised before any network activity
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingSetting { .. } | Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_setting_names_flag_and_env() {
        let err = WebAgentError::MissingSetting {
            flag: "bb-api-key",
            env: "BROWSERBASE_API_KEY",
        };
        let msg = err.to_string();
        assert!(msg.contains("--bb-api-key"));
        assert!(msg.contains("BROWSERBASE_API_KEY"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_output_error_mentions_path() {
        let err = WebAgentError::output(
            "/tmp/out/session-1-start.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("session-1-start.json"));
        assert!(!err.is_configuration());
    }
}
