//! Stagehand automation session
//!
//! Talks to the hosted Stagehand API: `sessions/start` provisions a
//! Browserbase browser, `sessions/{id}/agentExecute` runs the agent with a
//! streamed response, and `sessions/{id}/end` releases the browser.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::{AgentRequest, AgentResult, LogCallback, Result, WebAgentError};
use crate::remote::{self, endpoint};
use crate::remote::events::{parse_event_line, LineBuffer, StreamEvent};
use crate::remote::traits::{AutomationSession, SessionSettings};

const DOM_SETTLE_TIMEOUT_MS: u64 = 30_000;

/// Body of `POST /sessions/start`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartRequest<'a> {
    model_name: &'a str,
    verbose: u8,
    dom_settle_timeout_ms: u64,
    browserbase_session_create_params: Value,
}

#[derive(Debug, Deserialize)]
struct StartResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<StartData>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartData {
    session_id: String,
    #[serde(default = "default_available")]
    available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Default)]
struct SessionState {
    session_id: Option<String>,
    closed: bool,
}

/// One Stagehand session. Not reusable once closed.
pub struct StagehandSession {
    client: Client,
    base_url: String,
    settings: SessionSettings,
    logger: LogCallback,
    state: Mutex<SessionState>,
}

impl StagehandSession {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        settings: SessionSettings,
        logger: LogCallback,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            settings,
            logger,
            state: Mutex::new(SessionState::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn active_session_id(&self) -> Result<String> {
        let state = self.state();
        if state.closed {
            return Err(WebAgentError::remote("Session has already been closed"));
        }
        state
            .session_id
            .clone()
            .ok_or_else(|| WebAgentError::remote("Session has not been initialized"))
    }

    fn headers(&self, stream: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-bb-api-key", header_value(&self.settings.api_key)?);
        headers.insert("x-bb-project-id", header_value(&self.settings.project_id)?);
        headers.insert("x-model-api-key", header_value(&self.settings.model_api_key)?);
        headers.insert("x-sent-at", header_value(&Utc::now().to_rfc3339())?);
        headers.insert("x-language", HeaderValue::from_static("rust"));
        headers.insert("x-sdk-version", HeaderValue::from_static(env!("CARGO_PKG_VERSION")));
        if stream {
            headers.insert("x-stream-response", HeaderValue::from_static("true"));
        }
        Ok(headers)
    }

    fn create_params(&self) -> Value {
        json!({
            "projectId": self.settings.project_id,
            "region": self.settings.region.as_str(),
            "browserSettings": {
                "blockAds": self.settings.block_ads,
            },
        })
    }

    async fn post(&self, path: &str, body: &Value, stream: bool) -> Result<Response> {
        let url = endpoint(&self.base_url, path)?;
        tracing::debug!(%url, "stagehand request");

        self.client
            .post(url)
            .headers(self.headers(stream)?)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    WebAgentError::remote(format!(
                        "Cannot connect to Stagehand at {}",
                        self.base_url
                    ))
                } else {
                    WebAgentError::from(e)
                }
            })
    }

    /// Read the event stream until the agent reports a result or an error
    async fn read_agent_stream(&self, response: Response) -> Result<AgentResult> {
        let mut stream = response.bytes_stream();
        let mut lines = LineBuffer::default();

        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| WebAgentError::remote(format!("Stream error: {}", e)))?;
            for line in lines.push(&chunk) {
                if let Some(result) = self.handle_event_line(&line)? {
                    return Ok(result);
                }
            }
        }

        if let Some(line) = lines.finish() {
            if let Some(result) = self.handle_event_line(&line)? {
                return Ok(result);
            }
        }

        Err(WebAgentError::agent("Event stream ended without a result"))
    }

    fn handle_event_line(&self, line: &str) -> Result<Option<AgentResult>> {
        match parse_event_line(line) {
            Some(StreamEvent::Log(log)) => {
                (self.logger)(&log.message);
                Ok(None)
            }
            Some(StreamEvent::System(system)) => match system.status.as_str() {
                "finished" => {
                    let result = system.result.unwrap_or(Value::Null);
                    Ok(Some(parse_agent_result(result)?))
                }
                "error" => Err(WebAgentError::agent(
                    system
                        .error
                        .map(|e| remote::single_line(&e))
                        .unwrap_or_else(|| "unknown error".to_string()),
                )),
                status => {
                    tracing::debug!(status, "stagehand status");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AutomationSession for StagehandSession {
    async fn init(&self) -> Result<String> {
        let existing = {
            let state = self.state();
            if state.closed {
                return Err(WebAgentError::session_init("Session has already been closed"));
            }
            state.session_id.clone()
        };
        if let Some(existing) = existing {
            return Ok(existing);
        }

        let request = StartRequest {
            model_name: &self.settings.model_name,
            verbose: self.settings.verbose,
            dom_settle_timeout_ms: DOM_SETTLE_TIMEOUT_MS,
            browserbase_session_create_params: self.create_params(),
        };
        let body = serde_json::to_value(&request)?;

        let response = self.post("sessions/start", &body, false).await?;
        let status = response.status();
        if !status.is_success() {
            let body = remote::error_body(response).await;
            return Err(WebAgentError::session_init(format!("({}) {}", status, body)));
        }
        let text = response.text().await.unwrap_or_default();

        let parsed: StartResponse = serde_json::from_str(&text)
            .map_err(|e| WebAgentError::session_init(format!("unreadable response: {}", e)))?;
        let data = match parsed.data {
            Some(data) if parsed.success => data,
            _ => {
                let message = parsed
                    .message
                    .unwrap_or_else(|| remote::single_line(&text));
                return Err(WebAgentError::session_init(message));
            }
        };
        if !data.available {
            return Err(WebAgentError::session_init(
                "No browser sessions are available for this project",
            ));
        }

        tracing::info!(session_id = %data.session_id, region = %self.settings.region, "session started");
        self.state().session_id = Some(data.session_id.clone());
        Ok(data.session_id)
    }

    async fn execute_agent(&self, request: &AgentRequest) -> Result<AgentResult> {
        let session_id = self.active_session_id()?;
        let body = json!({
            "agentConfig": {
                "model": request.model,
                "instructions": request.system_prompt,
            },
            "executeOptions": {
                "instruction": request.instruction,
            },
        });

        let response = self
            .post(&format!("sessions/{}/agentExecute", session_id), &body, true)
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = remote::error_body(response).await;
            return Err(WebAgentError::agent(format!("({}) {}", status, body)));
        }

        self.read_agent_stream(response).await
    }

    async fn close(&self) -> Result<()> {
        let session_id = {
            let mut state = self.state();
            if state.closed {
                return Ok(());
            }
            state.closed = true;
            state.session_id.clone()
        };
        let Some(session_id) = session_id else {
            return Ok(());
        };

        let response = self
            .post(&format!("sessions/{}/end", session_id), &json!({}), false)
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = remote::error_body(response).await;
            return Err(WebAgentError::remote(format!(
                "Ending session failed ({}): {}",
                status, body
            )));
        }

        tracing::info!(%session_id, "session ended");
        Ok(())
    }

    fn session_id(&self) -> Option<String> {
        self.state().session_id.clone()
    }
}

/// The finished payload is either the result itself or `{ "result": ... }`
fn parse_agent_result(value: Value) -> Result<AgentResult> {
    let value = match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    };
    if !value.is_object() {
        return Err(WebAgentError::agent(format!(
            "Unexpected agent result: {}",
            value
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| WebAgentError::config(format!("Invalid header value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLine, Region};
    use std::sync::Arc;

    fn settings() -> SessionSettings {
        SessionSettings {
            region: Region::EuCentral1,
            block_ads: true,
            api_key: "bb-key".into(),
            project_id: "proj".into(),
            model_name: "google/gemini-2.5-pro".into(),
            model_api_key: "model-key".into(),
            verbose: 1,
        }
    }

    fn session_with_capture() -> (StagehandSession, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let logger: LogCallback = Arc::new(move |line: &LogLine| {
            sink.lock().unwrap().push(line.message.clone());
        });
        let session = StagehandSession::new(
            Client::new(),
            "http://127.0.0.1:9/v1",
            settings(),
            logger,
        );
        (session, seen)
    }

    #[test]
    fn test_create_params() {
        let (session, _) = session_with_capture();
        let params = session.create_params();
        assert_eq!(params["region"], "eu-central-1");
        assert_eq!(params["projectId"], "proj");
        assert_eq!(params["browserSettings"]["blockAds"], true);
    }

    #[test]
    fn test_headers_carry_credentials() {
        let (session, _) = session_with_capture();
        let headers = session.headers(true).unwrap();
        assert_eq!(headers["x-bb-api-key"], "bb-key");
        assert_eq!(headers["x-model-api-key"], "model-key");
        assert_eq!(headers["x-stream-response"], "true");
        assert!(!session.headers(false).unwrap().contains_key("x-stream-response"));
    }

    #[test]
    fn test_event_lines_route_logs_and_results() {
        let (session, seen) = session_with_capture();

        let none = session
            .handle_event_line(r#"data: {"type":"log","data":{"message":{"message":"step 1"}}}"#)
            .unwrap();
        assert!(none.is_none());

        let result = session
            .handle_event_line(
                r#"data: {"type":"system","data":{"status":"finished","result":{"success":true,"message":"done","completed":true,"actions":[]}}}"#,
            )
            .unwrap()
            .unwrap();
        assert_eq!(result.message, "done");
        assert_eq!(seen.lock().unwrap().as_slice(), &["step 1".to_string()]);
    }

    #[test]
    fn test_error_event_fails() {
        let (session, _) = session_with_capture();
        let err = session
            .handle_event_line(r#"data: {"type":"system","data":{"status":"error","error":"quota exceeded"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_parse_wrapped_result() {
        let result =
            parse_agent_result(json!({"result": {"success": false, "message": "nope"}})).unwrap();
        assert!(!result.success);
        assert!(parse_agent_result(Value::Null).is_err());
    }

    #[tokio::test]
    async fn test_execute_before_init_fails() {
        let (session, _) = session_with_capture();
        let request = AgentRequest {
            instruction: "x".into(),
            system_prompt: "y".into(),
            model: "m".into(),
        };
        let err = session.execute_agent(&request).await.unwrap_err();
        assert!(err.to_string().contains("not been initialized"));
    }

    #[tokio::test]
    async fn test_close_without_session_is_noop() {
        let (session, _) = session_with_capture();
        session.close().await.unwrap();
        assert!(session.session_id().is_none());
    }
}
