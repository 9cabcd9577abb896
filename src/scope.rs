// src/scope.rs
// =============================================================================
// The site scope: which links belong to the site we are crawling.
//
// The rule is a plain string prefix, applied to the raw href value:
// - "https://site.edu/a" with scope "https://site.edu" -> in scope, kept as-is
// - "/b"                                             -> "https://site.edu/b"
// - anything else (other hosts, mailto:, #frag, ../x) -> out of scope
//
// The scope is validated once with the `url` crate so that a typo in the
// command line fails fast instead of producing an empty crawl.
// =============================================================================

use std::fmt;
use url::Url;

use crate::error::CrawlError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
    prefix: String,
    host: String,
}

impl SiteScope {
    /// Validates `scope` as an absolute http(s) URL and keeps it verbatim as
    /// the membership prefix.
    pub fn parse(scope: &str) -> Result<Self, CrawlError> {
        let prefix = scope.trim();
        let invalid = |reason: String| CrawlError::InvalidScope {
            scope: scope.to_string(),
            reason,
        };

        let url = Url::parse(prefix).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        let host = url
            .host_str()
            .ok_or_else(|| invalid("URL has no host".to_string()))?
            .to_string();

        Ok(Self {
            prefix: prefix.to_string(),
            host,
        })
    }

    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(&self.prefix)
    }

    /// Maps a raw anchor target to an absolute in-scope URL, or None if the
    /// target is out of scope.
    ///
    /// Protocol-relative targets ("//cdn.example.com/x") point at another
    /// host and are rejected even though they start with '/'.
    pub fn resolve(&self, href: &str) -> Option<String> {
        if self.contains(href) {
            return Some(href.to_string());
        }
        if href.starts_with("//") {
            return None;
        }
        href.strip_prefix('/')
            .map(|path| format!("{}/{}", self.prefix.trim_end_matches('/'), path))
    }

    /// Checks that the seed URL parses and lies inside this scope.
    pub fn admit_seed(&self, seed: &str) -> Result<String, CrawlError> {
        let seed = seed.trim();
        Url::parse(seed).map_err(|e| CrawlError::InvalidSeed {
            seed: seed.to_string(),
            reason: e.to_string(),
        })?;

        if !self.contains(seed) {
            return Err(CrawlError::SeedOutOfScope {
                seed: seed.to_string(),
                scope: self.prefix.clone(),
            });
        }
        Ok(seed.to_string())
    }

    /// Default snapshot file name: "pratt.duke.edu" -> "pratt_duke_edu.json"
    pub fn snapshot_file_name(&self) -> String {
        format!("{}.json", self.host.replace('.', "_"))
    }
}

impl fmt::Display for SiteScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)
    }
}
