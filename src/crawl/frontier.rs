// src/crawl/frontier.rs
// =============================================================================
// The frontier: every URL the crawl has discovered, with its status.
//
// Invariants kept by this type (there is no way to break them from outside):
// - entries are only ever added, never removed
// - merging a URL that is already present leaves its status alone
// - a Checked URL never goes back to Not-checked
//
// On disk the frontier is a flat JSON object:
//   { "https://site.edu": "Checked", "https://site.edu/about": "Not-checked" }
//
// Rust concepts:
// - BTreeMap: a sorted map, so snapshots are written in a stable order
// - #[serde(transparent)]: serialize the struct as its single inner field
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Visitation status of a single frontier entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkStatus {
    /// Discovered, not yet fetched
    #[serde(rename = "Not-checked")]
    Unvisited,
    /// Fetch attempted (successfully or not)
    #[serde(rename = "Checked")]
    Visited,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Unvisited => "Not-checked",
            LinkStatus::Visited => "Checked",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontier {
    links: BTreeMap<String, LinkStatus>,
}

impl Frontier {
    /// A fresh frontier holding only the seed, unvisited.
    pub fn with_seed(seed: impl Into<String>) -> Self {
        let mut frontier = Self::default();
        frontier.insert(seed.into());
        frontier
    }

    /// Inserts `url` as unvisited unless it is already present.
    ///
    /// Returns true if the URL was new.
    pub fn insert(&mut self, url: String) -> bool {
        if self.links.contains_key(&url) {
            return false;
        }
        self.links.insert(url, LinkStatus::Unvisited);
        true
    }

    /// Merges a batch of discovered URLs. Returns how many were new.
    pub fn merge<I>(&mut self, discovered: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        discovered
            .into_iter()
            .filter(|url| self.insert(url.clone()))
            .count()
    }

    /// Flips `url` to visited. A URL that was never discovered is added as
    /// visited so the attempt is still recorded.
    pub fn mark_visited(&mut self, url: &str) {
        match self.links.get_mut(url) {
            Some(status) => *status = LinkStatus::Visited,
            None => {
                self.links.insert(url.to_string(), LinkStatus::Visited);
            }
        }
    }

    pub fn status(&self, url: &str) -> Option<LinkStatus> {
        self.links.get(url).copied()
    }

    /// The URLs still waiting to be fetched, in sorted order.
    pub fn unvisited(&self) -> Vec<String> {
        self.links
            .iter()
            .filter(|(_, status)| **status == LinkStatus::Unvisited)
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn unvisited_count(&self) -> usize {
        self.links
            .values()
            .filter(|status| **status == LinkStatus::Unvisited)
            .count()
    }

    pub fn visited_count(&self) -> usize {
        self.len() - self.unvisited_count()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.unvisited_count() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LinkStatus)> {
        self.links.iter().map(|(url, status)| (url.as_str(), *status))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why BTreeMap instead of HashMap?
//    - Both give map semantics; BTreeMap keeps keys sorted
//    - Sorted keys mean the same frontier always serializes to the same JSON,
//      which makes snapshots easy to diff and tests easy to write
//
// 2. What does #[serde(rename = "...")] do?
//    - Changes the name used on the wire without changing the Rust name
//    - LinkStatus::Visited is written as "Checked"
//
// 3. Why is `links` private?
//    - Callers can only go through insert / merge / mark_visited
//    - None of those can remove an entry or un-check a URL
//
// 4. What is `impl Into<String>`?
//    - Accepts anything convertible to String (&str, String, ...)
//    - with_seed("https://site.edu") and with_seed(url_string) both work
// -----------------------------------------------------------------------------
