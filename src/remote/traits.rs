//! Traits for the two remote services
//!
//! The orchestrator only talks to these, so a run can be driven against
//! Browserbase/Stagehand or against in-process fakes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{AgentRequest, AgentResult, LogCallback, Region, Result};

/// Settings an automation session is created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub region: Region,
    pub block_ads: bool,
    pub api_key: String,
    pub project_id: String,
    pub model_name: String,
    pub model_api_key: String,
    /// Driver log verbosity (0-2)
    pub verbose: u8,
}

/// Session provisioning service (Browserbase)
#[async_trait]
pub trait ProvisioningApi: Send + Sync {
    /// URL of the real-time view of a running session
    async fn live_view_url(&self, session_id: &str) -> Result<String>;
}

/// A remote browser session driven by an AI agent (Stagehand)
#[async_trait]
pub trait AutomationSession: Send + Sync {
    /// Start the remote session and return its id
    async fn init(&self) -> Result<String>;

    /// Run the agent to completion. Log events go to the session's callback.
    async fn execute_agent(&self, request: &AgentRequest) -> Result<AgentResult>;

    /// End the remote session. A session that never started is a no-op.
    async fn close(&self) -> Result<()>;

    /// Id issued by `init`, if it succeeded
    fn session_id(&self) -> Option<String>;
}

/// Builds an automation session wired to a log callback
pub type SessionFactory =
    Arc<dyn Fn(SessionSettings, LogCallback) -> Result<Arc<dyn AutomationSession>> + Send + Sync>;
