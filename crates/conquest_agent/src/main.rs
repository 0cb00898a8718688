//! Conquest agent binary.
//!
//! Answers a game host's decision requests as JSON lines.
//!
//! # Usage
//!
//! ```bash
//! # Default tunables
//! conquest_agent
//!
//! # Tunables from a RON file, debug logs on stderr
//! conquest_agent --config configs/agent.ron --verbose
//! ```
//!
//! # Protocol
//!
//! Input (stdin): request envelopes, one per line
//! Output (stdout): moves, one per line
//! Logs (stderr): Debug information, filtered by `RUST_LOG` when set
//!
//! See the protocol module for the request/move format.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use conquest_agent::{load_config, Agent, AgentRunner};
use conquest_core::config::AgentConfig;

#[derive(Parser)]
#[command(name = "conquest_agent")]
#[command(about = "Territory-conquest decision agent speaking JSON lines")]
#[command(version)]
struct Cli {
    /// RON file overriding the default tunables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(filter)
        .init();

    let config = match cli.config {
        Some(path) => match load_config(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not load config");
                return ExitCode::FAILURE;
            }
        },
        None => AgentConfig::default(),
    };

    tracing::info!("Starting session");
    let mut runner = AgentRunner::new(Agent::new(config));
    match runner.run_stdio() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Session aborted");
            ExitCode::FAILURE
        }
    }
}
