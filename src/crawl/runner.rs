// src/crawl/runner.rs
// =============================================================================
// The crawl loop: breadth-first expansion of the frontier until every
// discovered page has been checked.
//
// How one pass works:
// 1. Take the list of Not-checked URLs
// 2. Fetch each one and extract its same-site links
//    (up to `concurrency` fetches in flight at once)
// 3. Mark every URL from step 1 as Checked, whether the fetch worked or not
// 4. Merge the discovered links; URLs already in the frontier are left alone
// 5. Save a snapshot
// 6. Stop when nothing is Not-checked
//
// A URL is fetched at most once: step 1 is a snapshot taken before any
// fetching starts, and step 3 marks all of it Checked before the next pass
// takes its own snapshot. All frontier writes happen here, on one task,
// after the fan-out has been collected.
//
// Failures never stop the crawl. A page that can't be fetched or parsed
// contributes no links, and we log it so it can be told apart from a page
// that simply has no links.
// =============================================================================

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::frontier::Frontier;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, FetchError, ParseError};
use crate::page::{extract_links, PageFetcher};
use crate::scope::SiteScope;
use crate::snapshot::SnapshotSink;

/// Counters collected over a whole crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub iterations: usize,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub parse_failures: usize,
    pub persist_failures: usize,
}

#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub frontier: Frontier,
    pub stats: CrawlStats,
}

// What expanding a single page produced
enum PageOutcome {
    Links(HashSet<String>),
    FetchFailed(FetchError),
    ParseFailed(ParseError),
}

pub struct Crawler<F, S> {
    fetcher: F,
    sink: S,
    scope: SiteScope,
    concurrency: usize,
    politeness_delay: Duration,
}

impl<F, S> Crawler<F, S>
where
    F: PageFetcher,
    S: SnapshotSink,
{
    pub fn new(fetcher: F, sink: S, scope: SiteScope, config: &CrawlConfig) -> Self {
        Self {
            fetcher,
            sink,
            scope,
            concurrency: config.concurrency.max(1),
            politeness_delay: config.politeness_delay,
        }
    }

    /// Crawls from `seed_url` until the frontier is exhausted.
    ///
    /// Fails only if the seed is not a valid URL inside the scope.
    pub async fn run_crawl(&self, seed_url: &str) -> Result<CrawlOutcome, CrawlError> {
        let seed = self.scope.admit_seed(seed_url)?;
        Ok(self.resume(Frontier::with_seed(seed)).await)
    }

    /// Continues a crawl from an existing frontier. Checked entries are
    /// never fetched again.
    pub async fn resume(&self, mut frontier: Frontier) -> CrawlOutcome {
        let mut stats = CrawlStats::default();

        info!(
            scope = %self.scope,
            frontier_size = frontier.len(),
            unvisited = frontier.unvisited_count(),
            concurrency = self.concurrency,
            "starting crawl"
        );

        while !frontier.is_exhausted() {
            stats.iterations += 1;

            let pending = frontier.unvisited();
            let expanded = self.expand(pending).await;

            let mut discovered = Vec::new();
            let mut failures = 0;
            for (url, outcome) in &expanded {
                frontier.mark_visited(url);
                match outcome {
                    PageOutcome::Links(links) => {
                        stats.pages_fetched += 1;
                        discovered.extend(links.iter().cloned());
                    }
                    PageOutcome::FetchFailed(e) => {
                        stats.fetch_failures += 1;
                        failures += 1;
                        warn!(url = e.url(), error = %e, "fetch failed, page contributes no links");
                    }
                    PageOutcome::ParseFailed(e) => {
                        stats.pages_fetched += 1;
                        stats.parse_failures += 1;
                        failures += 1;
                        warn!(url = %url, error = %e, "could not parse page, page contributes no links");
                    }
                }
            }
            let new_links = frontier.merge(discovered);

            if let Err(e) = self.sink.save(&frontier) {
                stats.persist_failures += 1;
                error!(error = %e, "failed to save frontier snapshot, continuing");
            }

            info!(
                iteration = stats.iterations,
                pages = expanded.len(),
                new_links,
                failures,
                frontier_size = frontier.len(),
                unvisited = frontier.unvisited_count(),
                "crawl pass complete"
            );
        }

        info!(
            iterations = stats.iterations,
            pages = frontier.len(),
            fetch_failures = stats.fetch_failures,
            "crawl finished"
        );

        CrawlOutcome { frontier, stats }
    }

    // Fetch + extract for every URL in `pending`, at most `concurrency` at once.
    // Results come back in completion order.
    async fn expand(&self, pending: Vec<String>) -> Vec<(String, PageOutcome)> {
        let this = self;
        stream::iter(pending)
            .map(move |url| async move {
                let outcome = this.expand_page(&url).await;
                (url, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    async fn expand_page(&self, url: &str) -> PageOutcome {
        let outcome = match self.fetcher.fetch(url).await {
            Ok(body) => match extract_links(&body, &self.scope) {
                Ok(links) => {
                    debug!(url, links = links.len(), "page expanded");
                    PageOutcome::Links(links)
                }
                Err(e) => PageOutcome::ParseFailed(e),
            },
            Err(e) => PageOutcome::FetchFailed(e),
        };

        if !self.politeness_delay.is_zero() {
            tokio::time::sleep(self.politeness_delay).await;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::LinkStatus;
    use crate::error::PersistenceError;
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    // An in-memory website. Pages not listed answer with an empty body,
    // like a 404 page with no links.
    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, Option<String>>,
        hits: Arc<Mutex<HashMap<String, usize>>>,
    }

    impl FakeSite {
        fn page(mut self, url: &str, hrefs: &[&str]) -> Self {
            let html = hrefs
                .iter()
                .map(|href| format!(r#"<a href="{href}">link</a>"#))
                .collect::<String>();
            self.pages.insert(url.to_string(), Some(html));
            self
        }

        fn unreachable(mut self, url: &str) -> Self {
            self.pages.insert(url.to_string(), None);
            self
        }

        fn hit_counter(&self) -> Arc<Mutex<HashMap<String, usize>>> {
            Arc::clone(&self.hits)
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;
            match self.pages.get(url) {
                Some(Some(html)) => Ok(html.clone()),
                Some(None) => Err(FetchError::Connect {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                }),
                None => Ok(String::new()),
            }
        }
    }

    #[derive(Default, Clone)]
    struct MemorySink {
        snapshots: Arc<Mutex<Vec<Frontier>>>,
    }

    impl SnapshotSink for MemorySink {
        fn save(&self, frontier: &Frontier) -> Result<(), PersistenceError> {
            self.snapshots.lock().unwrap().push(frontier.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl SnapshotSink for FailingSink {
        fn save(&self, _frontier: &Frontier) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io {
                path: "/read-only/site.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn scope() -> SiteScope {
        SiteScope::parse("https://site.edu").unwrap()
    }

    fn crawler<S: SnapshotSink>(site: FakeSite, sink: S) -> Crawler<FakeSite, S> {
        Crawler::new(site, sink, scope(), &CrawlConfig::default())
    }

    fn as_map(frontier: &Frontier) -> BTreeMap<String, LinkStatus> {
        frontier.iter().map(|(url, status)| (url.to_string(), status)).collect()
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let site = FakeSite::default()
            .page("https://site.edu", &["/about", "https://other.edu"])
            .page("https://site.edu/about", &["https://site.edu"]);
        let outcome = crawler(site, MemorySink::default())
            .run_crawl("https://site.edu")
            .await
            .unwrap();

        let json = serde_json::to_value(&outcome.frontier).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "https://site.edu": "Checked",
                "https://site.edu/about": "Checked"
            })
        );
        assert_eq!(outcome.stats.iterations, 2);
        assert_eq!(outcome.stats.pages_fetched, 2);
        assert_eq!(outcome.stats.fetch_failures, 0);
    }

    #[tokio::test]
    async fn test_cycle_terminates_and_each_page_fetched_once() {
        let site = FakeSite::default()
            .page("https://site.edu", &["/a"])
            .page("https://site.edu/a", &["/b", "https://site.edu"])
            .page("https://site.edu/b", &["/a", "/c"])
            .page("https://site.edu/c", &["https://site.edu/a", "/"]);
        let hits = site.hit_counter();

        let outcome = crawler(site, MemorySink::default())
            .run_crawl("https://site.edu")
            .await
            .unwrap();

        assert!(outcome.frontier.is_exhausted());
        assert_eq!(outcome.frontier.len(), 5);
        let hits = hits.lock().unwrap();
        assert_eq!(hits.len(), 5);
        assert!(hits.values().all(|&count| count == 1));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_fatal() {
        let site = FakeSite::default()
            .page("https://site.edu", &["/down", "/up"])
            .unreachable("https://site.edu/down")
            .page("https://site.edu/up", &["/leaf"]);

        let outcome = crawler(site, MemorySink::default())
            .run_crawl("https://site.edu")
            .await
            .unwrap();

        assert_eq!(
            outcome.frontier.status("https://site.edu/down"),
            Some(LinkStatus::Visited)
        );
        assert_eq!(
            outcome.frontier.status("https://site.edu/leaf"),
            Some(LinkStatus::Visited)
        );
        assert_eq!(outcome.frontier.len(), 4);
        assert_eq!(outcome.stats.fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_unreachable_seed_ends_after_one_pass() {
        let site = FakeSite::default().unreachable("https://site.edu");
        let outcome = crawler(site, MemorySink::default())
            .run_crawl("https://site.edu")
            .await
            .unwrap();

        assert_eq!(outcome.stats.iterations, 1);
        assert_eq!(as_map(&outcome.frontier).len(), 1);
        assert_eq!(outcome.frontier.status("https://site.edu"), Some(LinkStatus::Visited));
    }

    #[tokio::test]
    async fn test_snapshot_after_every_pass_matches_growth() {
        let site = FakeSite::default()
            .page("https://site.edu", &["/a", "/b"])
            .page("https://site.edu/a", &["/a/1", "/a/2"])
            .page("https://site.edu/b", &["/a/2", "/b/1"]);
        let sink = MemorySink::default();
        let snapshots = Arc::clone(&sink.snapshots);

        let outcome = crawler(site, sink).run_crawl("https://site.edu").await.unwrap();

        let snapshots = snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), outcome.stats.iterations);
        assert_eq!(snapshots.last(), Some(&outcome.frontier));

        for pair in snapshots.windows(2) {
            assert!(pair[1].len() >= pair[0].len());
            assert!(pair[1].visited_count() >= pair[0].visited_count());
            // Nothing checked earlier goes back to Not-checked
            for (url, status) in pair[0].iter() {
                if status == LinkStatus::Visited {
                    assert_eq!(pair[1].status(url), Some(LinkStatus::Visited));
                }
            }
        }
        for snapshot in snapshots.iter() {
            assert!(snapshot.visited_count() <= snapshot.len());
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_stop_crawl() {
        let site = FakeSite::default()
            .page("https://site.edu", &["/a"])
            .page("https://site.edu/a", &[]);

        let outcome = crawler(site, FailingSink)
            .run_crawl("https://site.edu")
            .await
            .unwrap();

        assert!(outcome.frontier.is_exhausted());
        assert_eq!(outcome.frontier.len(), 2);
        assert_eq!(outcome.stats.persist_failures, outcome.stats.iterations);
    }

    #[tokio::test]
    async fn test_seed_outside_scope_rejected() {
        let result = crawler(FakeSite::default(), MemorySink::default())
            .run_crawl("https://other.edu/start")
            .await;
        assert!(matches!(result, Err(CrawlError::SeedOutOfScope { .. })));
    }

    #[tokio::test]
    async fn test_resume_skips_checked_pages() {
        let site = FakeSite::default()
            .page("https://site.edu", &["/a", "/never-followed"])
            .page("https://site.edu/a", &["/b"]);
        let hits = site.hit_counter();

        let mut frontier = Frontier::with_seed("https://site.edu");
        frontier.merge(vec!["https://site.edu/a".to_string()]);
        frontier.mark_visited("https://site.edu");

        let outcome = crawler(site, MemorySink::default()).resume(frontier).await;

        assert!(!hits.lock().unwrap().contains_key("https://site.edu"));
        assert_eq!(
            outcome.frontier.status("https://site.edu/b"),
            Some(LinkStatus::Visited)
        );
        assert_eq!(outcome.frontier.status("https://site.edu/never-followed"), None);
    }

    #[tokio::test]
    async fn test_exhausted_frontier_does_nothing() {
        let mut frontier = Frontier::with_seed("https://site.edu");
        frontier.mark_visited("https://site.edu");
        let sink = MemorySink::default();
        let snapshots = Arc::clone(&sink.snapshots);

        let outcome = crawler(FakeSite::default(), sink).resume(frontier.clone()).await;

        assert_eq!(outcome.stats.iterations, 0);
        assert_eq!(outcome.frontier, frontier);
        assert!(snapshots.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_passes_fetch_each_url_once() {
        // Every page links to every other page
        let urls: Vec<String> = (0..12).map(|i| format!("/p{i}")).collect();
        let hrefs: Vec<&str> = urls.iter().map(String::as_str).collect();
        let mut site = FakeSite::default().page("https://site.edu", &hrefs);
        for url in &urls {
            site = site.page(&format!("https://site.edu{url}"), &hrefs);
        }
        let hits = site.hit_counter();

        let config = CrawlConfig {
            concurrency: 4,
            ..CrawlConfig::default()
        };
        let outcome = Crawler::new(site, MemorySink::default(), scope(), &config)
            .run_crawl("https://site.edu")
            .await
            .unwrap();

        assert_eq!(outcome.frontier.len(), 13);
        assert_eq!(outcome.stats.iterations, 2);
        let hits = hits.lock().unwrap();
        assert_eq!(hits.len(), 13);
        assert!(hits.values().all(|&count| count == 1));
    }

    #[tokio::test]
    async fn test_politeness_delay_applied_per_fetch() {
        let site = FakeSite::default()
            .page("https://site.edu", &["/a"])
            .page("https://site.edu/a", &[]);
        let config = CrawlConfig {
            politeness_delay: Duration::from_millis(20),
            ..CrawlConfig::default()
        };

        let started = Instant::now();
        Crawler::new(site, MemorySink::default(), scope(), &config)
            .run_crawl("https://site.edu")
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
