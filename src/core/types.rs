//! Shared types used across modules
//!
//! Records persisted to the output directory and the payloads exchanged with
//! the automation service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A log event emitted by the remote automation driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<Value>,
    /// Anything else the driver attached
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogLine {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            category: None,
            message: message.into(),
            level: None,
            auxiliary: None,
            extra: Map::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Callback invoked for every log line the driver emits.
/// Implementations must not panic and must not block for long.
pub type LogCallback = Arc<dyn Fn(&LogLine) + Send + Sync>;

/// A single browser action the agent reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    #[serde(rename = "type", default)]
    pub action_type: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Token usage reported by the agent run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub inference_time_ms: u64,
}

/// Outcome of an agent run, as returned by the automation service.
/// Fields the service adds beyond the known ones are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub actions: Vec<AgentAction>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<AgentUsage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentResult {
    /// Create a finished result with a message and no actions
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            actions: Vec::new(),
            completed: true,
            usage: None,
            extra: Map::new(),
        }
    }
}

/// Agent execution request
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRequest {
    /// Natural-language task for this run
    pub instruction: String,
    /// Behaviour-shaping prompt shared by every run
    pub system_prompt: String,
    /// Model driving the agent
    pub model: String,
}

/// Record written when the session has started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecord {
    pub instruction: String,
    pub session_id: String,
    pub session_live_url: String,
    pub started_at: DateTime<Utc>,
}

/// Record written once the agent has finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(flatten)]
    pub result: AgentResult,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_result_keeps_unknown_fields() {
        let raw = json!({
            "success": true,
            "message": "Found 3 results",
            "actions": [{"type": "click", "x": 10}],
            "completed": true,
            "metadata": {"steps": 4}
        });
        let result: AgentResult = serde_json::from_value(raw).unwrap();
        assert_eq!(result.actions[0].action_type, "click");
        assert_eq!(result.extra["metadata"]["steps"], 4);

        let record = ResultRecord {
            result,
            completed_at: Utc::now(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["message"], "Found 3 results");
        assert_eq!(value["metadata"]["steps"], 4);
        assert_eq!(value["actions"][0]["x"], 10);
        assert!(value.get("completedAt").is_some());
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_start_record_field_names() {
        let record = StartRecord {
            instruction: "find the weather".into(),
            session_id: "abc".into(),
            session_live_url: "https://live".into(),
            started_at: Utc::now(),
        };
        let value = serde_json::to_value(&record).unwrap();
        for key in ["instruction", "sessionId", "sessionLiveUrl", "startedAt"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_log_line_minimal_and_extra() {
        let line: LogLine =
            serde_json::from_value(json!({"message": "navigating", "timestamp": "t"})).unwrap();
        assert_eq!(line.message, "navigating");
        assert!(line.category.is_none());
        assert_eq!(line.extra["timestamp"], "t");

        let out = serde_json::to_string(&LogLine::new("hi").with_category("agent")).unwrap();
        assert_eq!(out, r#"{"category":"agent","message":"hi"}"#);
    }
}
