// src/page/html.rs
// =============================================================================
// This module pulls same-site links out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (built on html5ever, Mozilla's parser)
// - Never fails on broken markup; it recovers the way a browser does
// - Supports CSS selectors for finding elements
//
// Each <a href="..."> target goes through SiteScope::resolve:
//   href = "https://site.edu/a"  -> kept
//   href = "/b"                  -> "https://site.edu/b"
//   href = "https://other.edu/c" -> dropped
//   href = "mailto:x@y.com"      -> dropped
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;

use crate::error::ParseError;
use crate::scope::SiteScope;

const ANCHOR_SELECTOR: &str = "a[href]";

/// Returns the set of in-scope absolute URLs linked from `html`.
///
/// Duplicates on the same page collapse to one entry. Anchors without an
/// href are ignored.
pub fn extract_links(html: &str, scope: &SiteScope) -> Result<HashSet<String>, ParseError> {
    let selector = Selector::parse(ANCHOR_SELECTOR).map_err(|e| ParseError::Selector {
        selector: ANCHOR_SELECTOR.to_string(),
        message: e.to_string(),
    })?;

    let document = Html::parse_document(html);

    let links = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| scope.resolve(href))
        .collect();

    Ok(links)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is filter_map?
//    - Runs a closure that returns Option<T> on each item
//    - Keeps the Some values, drops the None ones
//    - Here it is used twice: "has an href?" and then "is it in scope?"
//
// 2. Why collect into a HashSet?
//    - A page often links to the same URL many times (header, footer, ...)
//    - The set keeps one copy of each
//
// 3. Why return Result if html5ever never fails?
//    - Building the CSS selector can fail in principle
//    - Returning the error lets the crawl loop log it and move on instead of
//      panicking
// -----------------------------------------------------------------------------
