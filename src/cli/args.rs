//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::core::config::{
    Region, RunOptions, DEFAULT_MODEL, DEFAULT_OUTPUT_DIR, DEFAULT_SYSTEM_PROMPT, DEFAULT_VERBOSE,
};

/// Run an AI agent on a remote Browserbase browser and record the session
#[derive(Parser, Debug, Clone)]
#[command(name = "aicerts-web-agent")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// What the agent should do, in plain language
    pub instruction: String,

    /// Browserbase region to run the browser in
    #[arg(long, short = 'r', value_enum, default_value_t = Region::ApSoutheast1)]
    pub region: Region,

    /// Browserbase API key [env: BROWSERBASE_API_KEY]
    #[arg(long, short = 'b')]
    pub bb_api_key: Option<String>,

    /// Browserbase project id [env: BROWSERBASE_PROJECT_ID]
    #[arg(long, short = 'p')]
    pub bb_project_id: Option<String>,

    /// API key for the agent model provider [env: MODEL_API_KEY]
    #[arg(long, short = 'k')]
    pub model_api_key: Option<String>,

    /// Model driving the agent
    #[arg(long, short = 'm', default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Directory for session records and logs
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// System prompt given to the agent
    #[arg(long, short = 's', default_value = DEFAULT_SYSTEM_PROMPT)]
    pub system_prompt: String,

    /// Driver log verbosity (0-2)
    #[arg(long, default_value_t = DEFAULT_VERBOSE, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub verbose: u8,

    /// Open the live view in the default browser
    #[arg(long)]
    pub open: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    pub debug: bool,
}

impl Args {
    /// Options for the orchestrator; secrets stay unresolved
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            region: self.region,
            bb_api_key: self.bb_api_key.clone(),
            bb_project_id: self.bb_project_id.clone(),
            model_api_key: self.model_api_key.clone(),
            model: self.model.clone(),
            output_dir: self.output_dir.clone(),
            system_prompt: self.system_prompt.clone(),
            verbose: self.verbose,
            open_live_view: self.open,
        }
    }
}
