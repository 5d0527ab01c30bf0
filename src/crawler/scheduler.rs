//! Traversal strategies
//!
//! This module handles:
//! - Sequential depth-first traversal over an explicit stack
//! - Concurrent level-synchronized breadth-first traversal over a bounded
//!   worker pool
//! - Politeness delays between pages or levels

use crate::crawler::coordinator::{CrawlContext, Visit};
use crate::crawler::fetcher::PageFetcher;
use crate::url::canonicalize;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Message recorded for URLs whose worker died before storing a record
const WORKER_FAILED: &str = "worker task failed before recording a result";

/// How the frontier is explored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One page at a time, depth first
    Sequential,

    /// One level at a time, pages of a level fetched in parallel
    Concurrent,
}

impl Strategy {
    pub fn from_concurrent(concurrent: bool) -> Self {
        if concurrent {
            Self::Concurrent
        } else {
            Self::Sequential
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Concurrent => write!(f, "concurrent"),
        }
    }
}

async fn politeness_delay(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Depth-first traversal from `seed`
///
/// Children are pushed in reverse so the first extracted link is explored
/// first, matching recursive order. Stops at the first claim refused for
/// lack of budget.
pub(crate) async fn run_sequential<F: PageFetcher>(ctx: &CrawlContext<F>, seed: Url) {
    let max_depth = ctx.config.crawler.max_depth;
    let delay = ctx.config.crawler.delay();
    let mut stack = vec![(seed, 0u32)];

    while let Some((url, depth)) = stack.pop() {
        let links = match ctx.visit(&url, depth).await {
            Visit::Recorded { links } => links,
            Visit::Skipped => continue,
            Visit::BudgetExhausted => break,
        };

        if depth >= max_depth || links.is_empty() {
            continue;
        }

        // With no slots left the next pop only records the budget hit
        if ctx.state.remaining() > 0 {
            politeness_delay(delay).await;
        }

        stack.extend(links.into_iter().rev().map(|link| (link, depth + 1)));
    }
}

/// Level-synchronized breadth-first traversal from `seed`
///
/// The seed is processed in the calling task. Every following level is
/// dispatched to at most `workers` concurrent tasks and fully joined before
/// the next one starts.
pub(crate) async fn run_concurrent<F: PageFetcher + 'static>(
    ctx: Arc<CrawlContext<F>>,
    seed: Url,
) {
    let max_depth = ctx.config.crawler.max_depth;
    let delay = ctx.config.crawler.delay();

    if let Visit::Recorded { links } = ctx.visit(&seed, 0).await {
        if max_depth > 0 {
            ctx.state
                .push_next_level(links.into_iter().map(|link| (link, 1)));
        }
    }

    for depth in 1..=max_depth {
        if ctx.state.check_pending_against_budget() {
            break;
        }

        let batch = dedup_unvisited(&ctx, ctx.state.take_next_level());
        if batch.is_empty() {
            break;
        }

        ctx.observer.level_started(depth, batch.len());
        let failed = run_level(&ctx, &batch).await;
        if failed > 0 {
            ctx.state.record_unfinished(&batch, WORKER_FAILED);
        }

        // One pause between levels, skipped once nothing can follow
        if depth < max_depth && ctx.state.remaining() > 0 {
            politeness_delay(delay).await;
        }
    }
}

/// Drops duplicates and already claimed URLs from a level snapshot
///
/// Entries are compared by canonical key; the first spelling seen is kept.
fn dedup_unvisited<F>(ctx: &CrawlContext<F>, batch: Vec<(Url, u32)>) -> Vec<(Url, u32)> {
    let mut seen = HashSet::new();
    batch
        .into_iter()
        .filter(|(url, _)| {
            let key = canonicalize(url).to_string();
            !ctx.state.is_visited(&key) && seen.insert(key)
        })
        .collect()
}

/// Runs one level on a fresh pool and waits for every task
///
/// Returns the number of tasks that failed to complete.
async fn run_level<F: PageFetcher + 'static>(
    ctx: &Arc<CrawlContext<F>>,
    batch: &[(Url, u32)],
) -> usize {
    let semaphore = Arc::new(Semaphore::new(ctx.config.crawler.workers));
    let mut tasks = JoinSet::new();

    for (url, depth) in batch.iter().cloned() {
        let ctx = Arc::clone(ctx);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            // The semaphore is never closed
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };

            if let Visit::Recorded { links } = ctx.visit(&url, depth).await {
                if depth < ctx.config.crawler.max_depth {
                    ctx.state
                        .push_next_level(links.into_iter().map(|link| (link, depth + 1)));
                }
            }
        });
    }

    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        if joined.is_err() {
            failed += 1;
        }
    }
    failed
}
