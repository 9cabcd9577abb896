// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl:  discover every page of a site, starting from a seed URL
// - status: summarize a frontier snapshot written by an earlier crawl
//
// Every crawl flag can also come from a CRAWLER_* environment variable
// (clap's `env` feature). A flag given on the command line wins.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "site-crawler",
    version = "0.1.0",
    about = "Breadth-first crawler that discovers every page of a single website",
    long_about = "site-crawler starts from a seed URL and keeps following same-site links \
                  until no undiscovered pages remain. Progress is saved to a JSON snapshot \
                  after every pass, so an interrupted crawl can be resumed."
)]
pub struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "CRAWLER_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and record every same-site page
    ///
    /// Example: site-crawler crawl https://pratt.duke.edu --delay-ms 200
    Crawl(CrawlArgs),

    /// Summarize a frontier snapshot
    ///
    /// Example: site-crawler status pratt_duke_edu.json
    Status {
        /// Path to a snapshot written by `crawl`
        snapshot: PathBuf,

        /// Print the full URL -> status mapping as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Seed URL to start crawling from (e.g., https://pratt.duke.edu)
    pub seed_url: String,

    /// Site scope prefix; links outside it are ignored (default: the seed URL)
    #[arg(long, env = "CRAWLER_SCOPE")]
    pub scope: Option<String>,

    /// Snapshot file (default: derived from the host, e.g. pratt_duke_edu.json)
    #[arg(long, short, env = "CRAWLER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Continue from an existing snapshot instead of starting over
    #[arg(long)]
    pub resume: bool,

    /// Print the final frontier as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "CRAWLER_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Pause after each request, in milliseconds
    #[arg(long, default_value_t = 0, env = "CRAWLER_DELAY_MS")]
    pub delay_ms: u64,

    /// Maximum concurrent requests within one crawl pass
    #[arg(long, default_value_t = 1, env = "CRAWLER_CONCURRENCY")]
    pub concurrency: usize,

    /// Override the User-Agent header
    #[arg(long, env = "CRAWLER_USER_AGENT")]
    pub user_agent: Option<String>,
}
