//! The value returned by a completed crawl run

use crate::crawler::Strategy;
use crate::output::store::ResultStore;
use crate::state::CrawlOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a crawl run hands to downstream consumers
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Canonical seed URL
    pub seed: String,

    /// Traversal strategy used for the run
    pub strategy: Strategy,

    /// How the run terminated
    pub outcome: CrawlOutcome,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Number of URLs claimed (each claimed URL has exactly one record)
    pub pages_claimed: usize,

    /// Canonical URL -> page or error record
    pub records: ResultStore,
}

impl CrawlReport {
    /// Wall-clock duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// True when the page budget cut the traversal short
    pub fn budget_exhausted(&self) -> bool {
        self.outcome == CrawlOutcome::BudgetExhausted
    }
}
