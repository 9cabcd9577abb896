// src/logging.rs
// =============================================================================
// Sets up `tracing` output for the process.
//
// Logs always go to stderr so that `--json` output on stdout stays clean.
// The level is controlled by RUST_LOG; without it we log this crate at info.
// =============================================================================

use anyhow::Result;
use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

const DEFAULT_DIRECTIVE: &str = "site_crawler=info";

pub fn init(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVE))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
