//! Diagnostic tracing
//!
//! Tracing output is for whoever runs the binary and goes to stderr. It is
//! separate from the per-session log file, which records driver events and
//! is always written regardless of `RUST_LOG`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`. `debug` turns on debug output for
/// this crate on top of whatever `RUST_LOG` says.
pub fn init(debug: bool) {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if debug {
        if let Ok(directive) = "aicerts_web_agent=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
