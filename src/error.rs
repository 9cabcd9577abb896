// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// Only CrawlError is fatal, and only before the first iteration starts.
// Everything else is recorded, logged, and the crawl keeps going:
// - FetchError: the page contributes zero links
// - ParseError: the page contributes zero links
// - PersistenceError: the snapshot for this iteration is lost
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from #[error(...)]
// - #[from]: lets the ? operator convert one error type into another
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Transport-level failure while fetching a page.
///
/// A non-2xx response is NOT a FetchError: its body is still returned.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not resolve host for {url}")]
    Dns { url: String },

    #[error("connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("transport error fetching {url}: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url }
            | FetchError::Dns { url }
            | FetchError::Connect { url, .. }
            | FetchError::Transport { url, .. } => url,
        }
    }
}

/// The markup could not be turned into a list of anchors.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid anchor selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Writing or reading a frontier snapshot failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize frontier: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("snapshot {path} is not a valid frontier: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fatal problems with the crawl's input. Raised before any page is fetched.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid site scope '{scope}': {reason}")]
    InvalidScope { scope: String, reason: String },

    #[error("invalid seed URL '{seed}': {reason}")]
    InvalidSeed { seed: String, reason: String },

    #[error("seed URL '{seed}' is outside the site scope '{scope}'")]
    SeedOutOfScope { seed: String, scope: String },
}
