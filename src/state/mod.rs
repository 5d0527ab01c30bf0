//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunState`: lifecycle of a single crawl run
//! - `CrawlState`: visited set, page budget, results and next-level frontier,
//!   shared between workers under one lock

mod crawl_state;
mod run_state;

// Re-export main types
pub use crawl_state::{Claim, CrawlState};
pub use run_state::{CrawlOutcome, RunState};
