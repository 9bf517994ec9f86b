//! Stagehand streaming events
//!
//! Streamed calls answer with server-sent events, one JSON payload per
//! `data:` line:
//!
//! - `{"type":"log","data":{"message":{...}}}` carries a driver log line
//! - `{"type":"system","data":{"status":"finished","result":{...}}}` ends the call
//! - `{"type":"system","data":{"status":"error","error":"..."}}` fails it

use serde::Deserialize;
use serde_json::Value;

use crate::core::LogLine;

/// One decoded stream event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StreamEvent {
    System(SystemEvent),
    Log(LogEvent),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemEvent {
    pub status: String,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogEvent {
    pub message: LogLine,
}

/// Parse one line of the event stream. Blank lines, comments, and
/// payloads that are not events yield `None`.
pub fn parse_event_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    let payload = line.strip_prefix("data:").unwrap_or(line).trim();
    match serde_json::from_str(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!(error = %e, line = payload, "skipping stream line");
            None
        }
    }
}

/// Splits a byte stream into complete lines.
/// Bytes are buffered so multi-byte characters can straddle chunks.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    /// Append a chunk and return every line it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(newline_pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            let text = String::from_utf8_lossy(&line[..newline_pos]);
            lines.push(text.trim_end_matches('\r').to_string());
        }
        lines
    }

    /// Whatever is left once the stream has ended
    pub fn finish(self) -> Option<String> {
        let rest = String::from_utf8_lossy(&self.buffer);
        let rest = rest.trim();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}
