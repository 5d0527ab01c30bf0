//! Crawl progress observers
//!
//! The engine reports progress only through a [`CrawlObserver`] supplied by
//! the caller. [`TracingObserver`] forwards events to `tracing`;
//! [`NoopObserver`] discards them.

use crate::crawler::Strategy;
use crate::output::CrawlRecord;
use crate::state::CrawlOutcome;
use url::Url;

/// Receives crawl progress events
///
/// Callbacks may be invoked concurrently from several workers and must not
/// block for long. Every method has an empty default.
pub trait CrawlObserver: Send + Sync {
    /// The run started from `seed`
    fn crawl_started(&self, _seed: &Url, _strategy: Strategy) {}

    /// A concurrent level with `frontier` candidates is about to be dispatched
    fn level_started(&self, _depth: u32, _frontier: usize) {}

    /// A URL was claimed; `claimed` is the number of claims so far
    fn page_claimed(&self, _url: &Url, _depth: u32, _claimed: usize) {}

    /// A record was stored for a claimed URL
    fn page_recorded(&self, _record: &CrawlRecord) {}

    /// The run reached a terminal state
    fn crawl_finished(&self, _outcome: CrawlOutcome, _records: usize) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}

/// Observer that logs events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn crawl_started(&self, seed: &Url, strategy: Strategy) {
        tracing::info!(%seed, ?strategy, "Starting crawl");
    }

    fn level_started(&self, depth: u32, frontier: usize) {
        tracing::debug!(depth, frontier, "Dispatching level");
    }

    fn page_claimed(&self, url: &Url, depth: u32, claimed: usize) {
        tracing::info!("Crawling: {} (Depth: {}, Pages: {})", url, depth, claimed);
    }

    fn page_recorded(&self, record: &CrawlRecord) {
        match record {
            CrawlRecord::Page(page) => tracing::debug!(
                url = %page.url,
                status = page.status_code,
                links = page.links.len(),
                elapsed = page.elapsed_seconds,
                "Page extracted"
            ),
            CrawlRecord::Error(error) => tracing::warn!(
                url = %error.url,
                kind = error.kind.label(),
                "Error crawling {}: {}",
                error.url,
                error.error_message
            ),
        }
    }

    fn crawl_finished(&self, outcome: CrawlOutcome, records: usize) {
        tracing::info!(%outcome, "Crawl completed. Recorded {} URLs.", records);
    }
}
