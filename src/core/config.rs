//! Configuration for a web agent run
//!
//! Secrets come from CLI flags first, then environment variables.
//! Everything else has a static default. API endpoints can be pointed
//! elsewhere through the environment.

use std::env;
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WebAgentError};

/// Default Browserbase region
pub const DEFAULT_REGION: Region = Region::ApSoutheast1;
/// Default agent model
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-pro";
/// Default directory for session records
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
/// Default agent system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that can use a web browser. \
Carry out the user's instruction step by step and report what you found when you are done.";
/// Default driver log verbosity
pub const DEFAULT_VERBOSE: u8 = 1;

pub const BROWSERBASE_API_KEY_ENV: &str = "BROWSERBASE_API_KEY";
pub const BROWSERBASE_PROJECT_ID_ENV: &str = "BROWSERBASE_PROJECT_ID";
pub const MODEL_API_KEY_ENV: &str = "MODEL_API_KEY";
pub const BROWSERBASE_API_URL_ENV: &str = "BROWSERBASE_API_URL";
pub const STAGEHAND_API_URL_ENV: &str = "STAGEHAND_API_URL";

const DEFAULT_BROWSERBASE_API_URL: &str = "https://api.browserbase.com/v1";
const DEFAULT_STAGEHAND_API_URL: &str = "https://api.stagehand.browserbase.com/v1";

/// Browserbase regions a session can be provisioned in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Region {
    #[value(name = "us-west-2")]
    #[serde(rename = "us-west-2")]
    UsWest2,
    #[value(name = "us-east-1")]
    #[serde(rename = "us-east-1")]
    UsEast1,
    #[value(name = "eu-central-1")]
    #[serde(rename = "eu-central-1")]
    EuCentral1,
    #[value(name = "ap-southeast-1")]
    #[serde(rename = "ap-southeast-1")]
    ApSoutheast1,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UsWest2 => "us-west-2",
            Region::UsEast1 => "us-east-1",
            Region::EuCentral1 => "eu-central-1",
            Region::ApSoutheast1 => "ap-southeast-1",
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        DEFAULT_REGION
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options as supplied by the user, before secrets are resolved
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub region: Region,
    pub bb_api_key: Option<String>,
    pub bb_project_id: Option<String>,
    pub model_api_key: Option<String>,
    pub model: String,
    pub output_dir: PathBuf,
    pub system_prompt: String,
    /// Driver log verbosity (0-2)
    pub verbose: u8,
    /// Open the live view in the local browser once it is known
    pub open_live_view: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION,
            bb_api_key: None,
            bb_project_id: None,
            model_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            verbose: DEFAULT_VERBOSE,
            open_live_view: false,
        }
    }
}

/// Base URLs of the two remote services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Session provisioning API (debug URLs)
    pub browserbase: String,
    /// Automation API (session start, agent execution, end)
    pub stagehand: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            browserbase: DEFAULT_BROWSERBASE_API_URL.to_string(),
            stagehand: DEFAULT_STAGEHAND_API_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Apply `BROWSERBASE_API_URL` / `STAGEHAND_API_URL` overrides
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            browserbase: non_empty(lookup(BROWSERBASE_API_URL_ENV))
                .unwrap_or(defaults.browserbase),
            stagehand: non_empty(lookup(STAGEHAND_API_URL_ENV)).unwrap_or(defaults.stagehand),
        }
    }
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub region: Region,
    pub bb_api_key: String,
    pub bb_project_id: String,
    pub model_api_key: String,
    pub model: String,
    pub output_dir: PathBuf,
    pub system_prompt: String,
    pub verbose: u8,
    pub open_live_view: bool,
    pub endpoints: Endpoints,
}

impl RunConfig {
    /// Resolve secrets against the process environment
    pub fn resolve(options: &RunOptions) -> Result<Self> {
        Self::resolve_with(options, |key| env::var(key).ok())
    }

    /// Resolve secrets against an arbitrary environment source
    pub fn resolve_with(
        options: &RunOptions,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let bb_api_key = resolve_secret_with(
            options.bb_api_key.as_deref(),
            "bb-api-key",
            BROWSERBASE_API_KEY_ENV,
            &lookup,
        )?;
        let bb_project_id = resolve_secret_with(
            options.bb_project_id.as_deref(),
            "bb-project-id",
            BROWSERBASE_PROJECT_ID_ENV,
            &lookup,
        )?;
        let model_api_key = resolve_secret_with(
            options.model_api_key.as_deref(),
            "model-api-key",
            MODEL_API_KEY_ENV,
            &lookup,
        )?;

        if options.verbose > 2 {
            return Err(WebAgentError::config(format!(
                "verbose must be 0, 1 or 2 (got {})",
                options.verbose
            )));
        }

        Ok(Self {
            region: options.region,
            bb_api_key,
            bb_project_id,
            model_api_key,
            model: options.model.clone(),
            output_dir: options.output_dir.clone(),
            system_prompt: options.system_prompt.clone(),
            verbose: options.verbose,
            open_live_view: options.open_live_view,
            endpoints: Endpoints::from_lookup(&lookup),
        })
    }
}

/// Resolve a required value from a flag, falling back to `lookup(env_key)`.
/// Empty strings count as absent in both places.
pub fn resolve_secret_with(
    cli_value: Option<&str>,
    flag: &'static str,
    env_key: &'static str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    if let Some(value) = cli_value.filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }

    non_empty(lookup(env_key)).ok_or(WebAgentError::MissingSetting {
        flag,
        env: env_key,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
