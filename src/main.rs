//! aicerts-web-agent
//!
//! Main entry point for the CLI application.

use clap::Parser;

use aicerts_web_agent::{cli::Args, logging, RunOutcome};

#[tokio::main]
async fn main() {
    // Secrets and RUST_LOG may live in a .env file
    let _ = dotenvy::dotenv();

    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version print to stdout and succeed
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    logging::init(args.debug);

    if let Err(e) = try_main(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn try_main(args: Args) -> anyhow::Result<()> {
    let outcome = aicerts_web_agent::run(&args.instruction, &args.run_options()).await?;
    print_summary(&outcome);
    Ok(())
}

fn print_summary(outcome: &RunOutcome) {
    println!("Session:   {}", outcome.session_id);
    println!("Live view: {}", outcome.live_url);
    println!(
        "Agent:     {} ({})",
        outcome.result.message,
        if outcome.result.success {
            "success"
        } else {
            "not successful"
        }
    );
    for path in outcome.written_files() {
        println!("Wrote      {}", path.display());
    }
}
