//! Aggregate statistics over a crawl result
//!
//! This module provides the counts report generators consume instead of
//! walking the records themselves.

use crate::output::records::CrawlRecord;
use crate::output::report::CrawlReport;
use crate::output::store::ResultStore;
use serde::Serialize;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrawlStatistics {
    /// Total number of records (claimed URLs)
    pub total_records: u64,

    /// Records that are successfully extracted pages
    pub pages: u64,

    /// Records that are errors
    pub errors: u64,

    /// Error counts keyed by error kind label
    pub errors_by_kind: BTreeMap<String, u64>,

    /// Record counts keyed by depth
    pub records_by_depth: BTreeMap<u32, u64>,

    /// Outbound links over all pages
    pub total_links: u64,

    /// Images over all pages
    pub total_images: u64,

    /// Images with an empty alt attribute
    pub images_missing_alt: u64,

    /// Mean fetch time of successful pages
    pub average_elapsed_seconds: Option<f64>,
}

impl CrawlStatistics {
    /// Computes statistics from a result store
    pub fn from_store(store: &ResultStore) -> Self {
        let mut stats = Self::default();
        let mut elapsed_total = 0.0;

        for (_, record) in store.iter() {
            stats.total_records += 1;
            *stats.records_by_depth.entry(record.depth()).or_insert(0) += 1;

            match record {
                CrawlRecord::Page(page) => {
                    stats.pages += 1;
                    stats.total_links += page.links.len() as u64;
                    stats.total_images += page.images.len() as u64;
                    stats.images_missing_alt +=
                        page.images.iter().filter(|img| img.alt.trim().is_empty()).count() as u64;
                    elapsed_total += page.elapsed_seconds;
                }
                CrawlRecord::Error(error) => {
                    stats.errors += 1;
                    *stats
                        .errors_by_kind
                        .entry(error.kind.label().to_string())
                        .or_insert(0) += 1;
                }
            }
        }

        if stats.pages > 0 {
            stats.average_elapsed_seconds = Some(elapsed_total / stats.pages as f64);
        }

        stats
    }

    /// Computes statistics from a crawl report
    pub fn from_report(report: &CrawlReport) -> Self {
        Self::from_store(&report.records)
    }

    /// Percentage of records that are pages
    pub fn success_rate(&self) -> f64 {
        if self.total_records > 0 {
            (self.pages as f64 / self.total_records as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total URLs recorded: {}", stats.total_records);
    println!("  Pages: {}", stats.pages);
    println!("  Errors: {}", stats.errors);
    println!("  Total links found: {}", stats.total_links);
    println!(
        "  Images: {} ({} without alt text)",
        stats.total_images, stats.images_missing_alt
    );
    if let Some(avg) = stats.average_elapsed_seconds {
        println!("  Average response time: {:.3}s", avg);
    }
    println!();

    println!("Records by Depth:");
    for (depth, count) in &stats.records_by_depth {
        println!("  {}: {}", depth, count);
    }
    println!();

    if !stats.errors_by_kind.is_empty() {
        println!("Error Summary:");
        let mut error_counts: Vec<_> = stats.errors_by_kind.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in error_counts {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs extracted)",
        stats.success_rate(),
        stats.pages,
        stats.total_records
    );
}
