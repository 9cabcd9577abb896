// src/page/http.rs
// =============================================================================
// The page fetcher: one plain GET per URL, body returned as text.
//
// Key behaviour:
// - Sends an identifying User-Agent header (see config.rs)
// - Returns the body for ANY status code. A 404 page is still HTML and is
//   still parsed for links (usually there are none)
// - Only transport failures (DNS, refused connection, timeout, broken body)
//   become a FetchError
// - No retries; one attempt per call
//
// The crawl loop talks to the `PageFetcher` trait rather than to reqwest
// directly, so tests can swap in an in-memory site.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::CrawlConfig;
use crate::error::FetchError;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns the raw response body.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// `PageFetcher` backed by a shared reqwest client (connection pooling).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "non-success response, parsing body anyway");
        }

        response.text().await.map_err(|e| categorize_error(url, e))
    }
}

// Sorts a reqwest error into one of our FetchError kinds.
//
// reqwest doesn't expose a dedicated DNS flag, so like the link checker we
// look at the error text of connect failures.
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    let url = url.to_string();
    let message = error.to_string();

    if error.is_timeout() {
        FetchError::Timeout { url }
    } else if error.is_connect() {
        let lowered = format!("{error:?}").to_lowercase();
        if lowered.contains("dns") || lowered.contains("resolve") {
            FetchError::Dns { url }
        } else {
            FetchError::Connect { url, message }
        }
    } else {
        FetchError::Transport { url, message }
    }
}
