//! Output module: the record map produced by a crawl
//!
//! This module handles:
//! - The per-URL page and error records
//! - The result store keyed by canonical URL
//! - Aggregate statistics for report generators
//! - JSON export of a crawl report

pub mod json;
pub mod records;
pub mod report;
pub mod stats;
pub mod store;

pub use records::{
    ContentView, CrawlRecord, ErrorKind, ErrorRecord, Headings, ImageRef, LinkRef, PageRecord,
};
pub use report::CrawlReport;
pub use stats::{print_statistics, CrawlStatistics};
pub use store::ResultStore;
