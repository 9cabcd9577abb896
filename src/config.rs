// src/config.rs
// =============================================================================
// Runtime settings for a crawl.
//
// Values come from the command line (or CRAWLER_* environment variables,
// see cli.rs). Anything not given falls back to CrawlConfig::default().
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CrawlArgs;
use crate::scope::SiteScope;

/// Browser-like identifying header. Plain library user agents get a 403
/// from a lot of WordPress-hosted sites.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_5) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/50.0.2661.102 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Per-fetch transport timeout
    pub timeout: Duration,
    /// Pause after each fetch
    pub politeness_delay: Duration,
    /// Maximum fetches in flight within one iteration (at least 1)
    pub concurrency: usize,
    /// Where the frontier snapshot is written; None = derived from the scope
    pub snapshot_path: Option<PathBuf>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            politeness_delay: Duration::ZERO,
            concurrency: 1,
            snapshot_path: None,
        }
    }
}

impl CrawlConfig {
    /// Snapshot location for `scope`, honouring an explicit path.
    pub fn snapshot_path_for(&self, scope: &SiteScope) -> PathBuf {
        self.snapshot_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(scope.snapshot_file_name()))
    }
}

impl From<&CrawlArgs> for CrawlConfig {
    fn from(args: &CrawlArgs) -> Self {
        let defaults = CrawlConfig::default();
        Self {
            user_agent: args.user_agent.clone().unwrap_or(defaults.user_agent),
            timeout: Duration::from_secs(args.timeout_secs),
            politeness_delay: Duration::from_millis(args.delay_ms),
            concurrency: args.concurrency.max(1),
            snapshot_path: args.output.clone(),
        }
    }
}
