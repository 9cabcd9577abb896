// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling from a seed URL, pass by pass
// - Same-site restriction through SiteScope (doesn't crawl external sites)
// - Runs until no undiscovered pages remain; no depth limit
// - Optional politeness delay and bounded concurrency per pass
// - Frontier snapshot saved after every pass
//
// Submodules:
// - frontier: the URL -> Checked / Not-checked map
// - runner:   the crawl loop that drives the frontier to exhaustion
// =============================================================================

mod frontier;
mod runner;

pub use frontier::{Frontier, LinkStatus};
pub use runner::{CrawlOutcome, Crawler};
