// src/page/mod.rs
// =============================================================================
// Everything the crawler does with a single page.
//
// Submodules:
// - http: fetches the raw page body (PageFetcher trait + reqwest impl)
// - html: extracts same-site links from that body
// =============================================================================

mod html;
mod http;

pub use html::extract_links;
pub use http::{HttpFetcher, PageFetcher};
