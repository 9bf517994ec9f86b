//! Browserbase provisioning client
//!
//! Only the debug endpoint is needed: it hands out the live-view URLs of a
//! running session.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::core::{Result, WebAgentError};
use crate::remote::endpoint;
use crate::remote::traits::ProvisioningApi;

/// Browserbase REST client
#[derive(Clone)]
pub struct BrowserbaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Response of `GET /sessions/{id}/debug`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugUrls {
    pub debugger_fullscreen_url: String,
    #[serde(default)]
    pub debugger_url: Option<String>,
    #[serde(default)]
    pub ws_url: Option<String>,
}

impl BrowserbaseClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetch all debug URLs for a session
    pub async fn debug_urls(&self, session_id: &str) -> Result<DebugUrls> {
        let url = endpoint(&self.base_url, &format!("sessions/{}/debug", session_id))?;
        tracing::debug!(%url, "fetching debug urls");

        let response = self
            .client
            .get(url)
            .header("X-BB-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    WebAgentError::remote(format!(
                        "Cannot connect to Browserbase at {}",
                        self.base_url
                    ))
                } else {
                    WebAgentError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = super::error_body(response).await;
            return Err(WebAgentError::remote(format!(
                "Browserbase debug request failed ({}): {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ProvisioningApi for BrowserbaseClient {
    async fn live_view_url(&self, session_id: &str) -> Result<String> {
        Ok(self.debug_urls(session_id).await?.debugger_fullscreen_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_urls_parse() {
        let urls: DebugUrls = serde_json::from_str(
            r#"{"debuggerFullscreenUrl":"https://live/full","debuggerUrl":"https://live","wsUrl":"wss://x","pages":[]}"#,
        )
        .unwrap();
        assert_eq!(urls.debugger_fullscreen_url, "https://live/full");
        assert_eq!(urls.ws_url.as_deref(), Some("wss://x"));
    }
}
