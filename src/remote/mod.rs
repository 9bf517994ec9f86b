//! Remote module - Browserbase and Stagehand clients
//!
//! Browserbase provisions the browser and serves its live view. Stagehand
//! starts the automation session, runs the agent, and streams driver logs.

pub mod browserbase;
pub mod events;
pub mod stagehand;
pub mod traits;

use std::time::Duration;

use reqwest::{Client, Response};
use url::Url;

use crate::core::{Result, WebAgentError};

pub use browserbase::BrowserbaseClient;
pub use stagehand::StagehandSession;
pub use traits::{AutomationSession, ProvisioningApi, SessionFactory, SessionSettings};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client. Only connecting is bounded; agent runs can take as long as they take.
pub fn http_client() -> Result<Client> {
    Ok(Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?)
}

/// Read an error response body as one line of text
pub(crate) async fn error_body(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    single_line(&text)
}

/// Collapse runs of whitespace, newlines included, into single spaces
pub(crate) fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join `path` onto an API base URL, keeping the base's own path segments
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url> {
    let base = format!("{}/", base.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|url| url.join(path.trim_start_matches('/')))
        .map_err(|e| WebAgentError::config(format!("Invalid API URL '{}': {}", base, e)))
}
