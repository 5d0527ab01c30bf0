//! Frontier and visited-set bookkeeping for one crawl run
//!
//! All mutable state shared between workers lives behind a single mutex so
//! that check-visited, mark-visited and budget decrement happen as one step.
//! The lock is never held across an await point.
use crate::output::{CrawlRecord, ErrorKind, ErrorRecord, ResultStore};
use crate::url::canonicalize;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// Result of trying to claim a URL before fetching it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The URL is now owned by the caller; `claimed` counts this claim
    Claimed { claimed: usize },

    /// Another visit already claimed the URL
    AlreadyVisited,

    /// No page slots remain
    BudgetExhausted,
}

#[derive(Debug)]
struct Inner {
    visited: HashSet<String>,
    results: ResultStore,
    remaining: usize,
    next_level: Vec<(Url, u32)>,
    budget_hit: bool,
}

/// Shared crawl state, created fresh for every run
#[derive(Debug)]
pub struct CrawlState {
    inner: Mutex<Inner>,
}

impl CrawlState {
    /// Creates state with `max_pages` page slots
    pub fn new(max_pages: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                visited: HashSet::new(),
                results: ResultStore::new(),
                remaining: max_pages,
                next_level: Vec::new(),
                budget_hit: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Critical sections below never panic midway, so a poisoned lock
        // still guards consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically checks, marks and charges a URL against the budget
    ///
    /// `key` must be the canonical URL string.
    pub fn claim(&self, key: &str) -> Claim {
        let mut inner = self.lock();

        if inner.visited.contains(key) {
            return Claim::AlreadyVisited;
        }

        if inner.remaining == 0 {
            inner.budget_hit = true;
            return Claim::BudgetExhausted;
        }

        inner.visited.insert(key.to_string());
        inner.remaining -= 1;
        Claim::Claimed {
            claimed: inner.visited.len(),
        }
    }

    pub fn is_visited(&self, key: &str) -> bool {
        self.lock().visited.contains(key)
    }

    /// Stores the record for a claimed URL; `false` if it already had one
    pub fn record(&self, record: impl Into<CrawlRecord>) -> bool {
        self.lock().results.insert(record)
    }

    pub fn has_record(&self, key: &str) -> bool {
        self.lock().results.contains(key)
    }

    /// Page slots still available
    pub fn remaining(&self) -> usize {
        self.lock().remaining
    }

    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// True once a claim was refused for lack of budget
    pub fn budget_hit(&self) -> bool {
        self.lock().budget_hit
    }

    /// Queues candidates for the next level
    ///
    /// Entries hold the URL to fetch; claims use its canonical form.
    pub fn push_next_level(&self, links: impl IntoIterator<Item = (Url, u32)>) {
        self.lock().next_level.extend(links);
    }

    /// Snapshots and clears the next-level list
    pub fn take_next_level(&self) -> Vec<(Url, u32)> {
        std::mem::take(&mut self.lock().next_level)
    }

    /// Marks the budget as hit when slots are gone but unclaimed candidates remain
    ///
    /// Returns whether the budget is exhausted with work pending.
    pub fn check_pending_against_budget(&self) -> bool {
        let mut inner = self.lock();
        if inner.remaining > 0 {
            return false;
        }
        let pending = inner
            .next_level
            .iter()
            .any(|(url, _)| !inner.visited.contains(canonicalize(url).as_str()));
        if pending {
            inner.budget_hit = true;
        }
        pending
    }

    /// Records an error for every claimed URL in `dispatched` that has no record yet
    ///
    /// Used after a worker failed without reaching its own record step.
    /// Returns the number of records written.
    pub fn record_unfinished(&self, dispatched: &[(Url, u32)], message: &str) -> usize {
        let mut inner = self.lock();
        let mut written = 0;
        for (url, depth) in dispatched {
            let key = canonicalize(url).to_string();
            if inner.visited.contains(&key) && !inner.results.contains(&key) {
                inner.results.insert(ErrorRecord {
                    url: key,
                    depth: *depth,
                    error_message: message.to_string(),
                    kind: ErrorKind::Worker,
                });
                written += 1;
            }
        }
        written
    }

    /// Moves the results out, returning them with the number of claimed URLs
    ///
    /// Called once the run is terminal; the visited set is kept so later
    /// claims still see every URL as taken.
    pub fn take_results(&self) -> (ResultStore, usize) {
        let mut inner = self.lock();
        (std::mem::take(&mut inner.results), inner.visited.len())
    }
}
