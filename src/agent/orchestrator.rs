//! Session orchestrator
//!
//! Drives one instruction through one remote browser session:
//! start the session, persist a start record in the background, run the
//! agent, persist the result once the start record has landed, and always
//! close the session.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::fs;

use crate::agent::scope::SessionScope;
use crate::core::{
    AgentRequest, AgentResult, Result, ResultRecord, RunConfig, RunOptions, StartRecord,
    WebAgentError,
};
use crate::output::{write_record, SessionFiles, SessionLog};
use crate::remote::{
    self, AutomationSession, BrowserbaseClient, ProvisioningApi, SessionFactory,
    SessionSettings, StagehandSession,
};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub session_id: String,
    pub live_url: String,
    pub files: SessionFiles,
    pub result: AgentResult,
}

impl RunOutcome {
    /// Files written by the run, in the order they were written
    pub fn written_files(&self) -> Vec<PathBuf> {
        let mut files = vec![self.files.start.clone(), self.files.result.clone()];
        if self.files.logs.exists() {
            files.push(self.files.logs.clone());
        }
        files
    }
}

/// Runs instructions against the remote services
pub struct SessionRunner {
    config: RunConfig,
    provisioning: Arc<dyn ProvisioningApi>,
    sessions: SessionFactory,
}

impl SessionRunner {
    /// Wire the runner to Browserbase and Stagehand
    pub fn connect(config: RunConfig) -> Result<Self> {
        let http = remote::http_client()?;

        let provisioning: Arc<dyn ProvisioningApi> = Arc::new(BrowserbaseClient::new(
            http.clone(),
            config.endpoints.browserbase.clone(),
            config.bb_api_key.clone(),
        ));

        let stagehand_url = config.endpoints.stagehand.clone();
        let sessions: SessionFactory = Arc::new(move |settings, logger| {
            let session: Arc<dyn AutomationSession> = Arc::new(StagehandSession::new(
                http.clone(),
                stagehand_url.clone(),
                settings,
                logger,
            ));
            Ok(session)
        });

        Ok(Self::with_backends(config, provisioning, sessions))
    }

    /// Use caller-provided backends
    pub fn with_backends(
        config: RunConfig,
        provisioning: Arc<dyn ProvisioningApi>,
        sessions: SessionFactory,
    ) -> Self {
        Self {
            config,
            provisioning,
            sessions,
        }
    }

    fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            region: self.config.region,
            block_ads: true,
            api_key: self.config.bb_api_key.clone(),
            project_id: self.config.bb_project_id.clone(),
            model_name: self.config.model.clone(),
            model_api_key: self.config.model_api_key.clone(),
            verbose: self.config.verbose,
        }
    }

    /// Run one instruction end to end. The session is closed on every path.
    pub async fn run(&self, instruction: &str) -> Result<RunOutcome> {
        let log = SessionLog::new();
        let session = (self.sessions)(self.session_settings(), log.callback())?;

        let request = AgentRequest {
            instruction: instruction.to_string(),
            system_prompt: self.config.system_prompt.clone(),
            model: self.config.model.clone(),
        };

        SessionScope::new(session)
            .run(|session| self.drive(session, log, request))
            .await
    }

    async fn drive(
        &self,
        session: Arc<dyn AutomationSession>,
        log: Arc<SessionLog>,
        request: AgentRequest,
    ) -> Result<RunOutcome> {
        let session_id = session.init().await?;

        let dir = self.config.output_dir.clone();
        let files = SessionFiles::new(&dir, &session_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| WebAgentError::output(&dir, e))?;
        log.attach(&files.logs);

        let live_url = self.provisioning.live_view_url(&session_id).await?;
        tracing::info!(%session_id, %live_url, "session live");
        if self.config.open_live_view {
            open_live_view(&live_url);
        }

        let start = StartRecord {
            instruction: request.instruction.clone(),
            session_id: session_id.clone(),
            session_live_url: live_url.clone(),
            started_at: Utc::now(),
        };
        let start_write = {
            let dir = dir.clone();
            let name = SessionFiles::start_name(&session_id);
            tokio::spawn(async move { write_record(&dir, &name, &start).await })
        };

        tracing::info!(model = %request.model, "agent started");
        let executed = session.execute_agent(&request).await;

        // Join the start write on every path so it lands before anything else.
        let started = start_write.await;
        let result = executed?;
        started??;

        let record = ResultRecord {
            result: result.clone(),
            completed_at: Utc::now(),
        };
        write_record(&dir, &SessionFiles::result_name(&session_id), &record).await?;
        tracing::info!(success = result.success, "agent finished");

        Ok(RunOutcome {
            session_id,
            live_url,
            files,
            result,
        })
    }
}

/// Resolve configuration, connect, and run one instruction.
///
/// Missing secrets fail here before any client is built.
pub async fn run(instruction: &str, options: &RunOptions) -> Result<RunOutcome> {
    let config = RunConfig::resolve(options)?;
    SessionRunner::connect(config)?.run(instruction).await
}

fn open_live_view(url: &str) {
    if let Err(e) = webbrowser::open(url) {
        tracing::warn!(error = %e, "could not open live view");
    }
}
