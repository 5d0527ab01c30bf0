//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP and local file fetching
//! - HTML extraction of page records and links
//! - Sequential and concurrent traversal strategies
//! - Progress reporting through an injected observer

mod coordinator;
mod extractor;
mod fetcher;
mod observer;
mod scheduler;

pub use extractor::{extract, Extraction};
pub use fetcher::{
    build_http_client, is_html_content_type, FetchError, FetchedPage, HttpFetcher, PageFetcher,
};
pub use observer::{CrawlObserver, NoopObserver, TracingObserver};
pub use scheduler::Strategy;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::state::{CrawlOutcome, CrawlState, RunState};
use crate::url::{canonicalize, parse_seed, UrlPolicy};
use chrono::Utc;
use coordinator::CrawlContext;
use std::sync::Arc;

/// Site traversal engine
///
/// A `Crawler` holds validated configuration, a fetcher and an observer.
/// Each call to [`Crawler::run`] starts from empty state, so one crawler can
/// run several crawls.
///
/// # Example
///
/// ```no_run
/// use sitewalk::{Config, Crawler, TracingObserver};
/// use std::sync::Arc;
///
/// # async fn demo() -> sitewalk::Result<()> {
/// let crawler = Crawler::new(Config::default())?.with_observer(Arc::new(TracingObserver));
/// let report = crawler.run("https://example.com/").await?;
/// println!("{} records", report.records.len());
/// # Ok(())
/// # }
/// ```
pub struct Crawler<F = HttpFetcher> {
    config: Config,
    fetcher: Arc<F>,
    observer: Arc<dyn CrawlObserver>,
}

impl Crawler<HttpFetcher> {
    /// Creates a crawler fetching over HTTP with the configured client settings
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Configuration is valid and the client was built
    /// * `Err(SitewalkError)` - Invalid configuration or client construction failed
    pub fn new(config: Config) -> crate::Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config.http)?;
        Ok(Self::assemble(config, fetcher))
    }
}

impl<F: PageFetcher + 'static> Crawler<F> {
    /// Creates a crawler driven by a custom fetcher
    pub fn with_fetcher(config: Config, fetcher: F) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, fetcher))
    }

    fn assemble(config: Config, fetcher: F) -> Self {
        Self {
            config,
            fetcher: Arc::new(fetcher),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replaces the observer receiving progress events
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The strategy selected by the `concurrent` setting
    pub fn strategy(&self) -> Strategy {
        Strategy::from_concurrent(self.config.crawler.concurrent)
    }

    /// Crawls the site of `seed` and returns every recorded URL
    ///
    /// Per-page failures end up as error records; this only fails when the
    /// seed is not a usable URL.
    ///
    /// # Arguments
    ///
    /// * `seed` - Absolute `http`, `https` or `file` URL
    pub async fn run(&self, seed: &str) -> crate::Result<CrawlReport> {
        let seed = parse_seed(seed)?;
        let strategy = self.strategy();

        let mut run_state = RunState::Idle;
        run_state.transition(RunState::Running)?;
        let started_at = Utc::now();
        self.observer.crawl_started(&seed, strategy);

        let ctx = Arc::new(CrawlContext {
            config: self.config.clone(),
            policy: UrlPolicy::for_seed(&seed, &self.config.policy),
            fetcher: Arc::clone(&self.fetcher),
            observer: Arc::clone(&self.observer),
            state: CrawlState::new(self.config.crawler.max_pages),
        });

        match strategy {
            Strategy::Sequential => scheduler::run_sequential(&ctx, seed.clone()).await,
            Strategy::Concurrent => scheduler::run_concurrent(Arc::clone(&ctx), seed.clone()).await,
        }

        let outcome = if ctx.state.budget_hit() {
            CrawlOutcome::BudgetExhausted
        } else {
            CrawlOutcome::Completed
        };
        run_state.transition(outcome.into())?;

        let (records, pages_claimed) = ctx.state.take_results();
        self.observer.crawl_finished(outcome, records.len());

        Ok(CrawlReport {
            seed: canonicalize(&seed).to_string(),
            strategy,
            outcome,
            started_at,
            finished_at: Utc::now(),
            pages_claimed,
            records,
        })
    }
}

/// Runs a complete crawl over HTTP with the given configuration
///
/// This is the main entry point for a one-off crawl. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP client
/// 3. Traverse the site of `seed` with the configured strategy
/// 4. Return the report with one record per claimed URL
pub async fn crawl(config: Config, seed: &str) -> crate::Result<CrawlReport> {
    Crawler::new(config)?.run(seed).await
}
