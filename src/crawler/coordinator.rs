//! Per-URL processing shared by both strategies
//!
//! This module owns the step every scheduled URL goes through:
//! - Enforcing the depth bound
//! - Claiming the canonical key against the visited set and budget
//! - Fetching, then turning the response into a page or error record
//! - Filtering discovered links through the URL policy

use crate::config::Config;
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::crawler::observer::CrawlObserver;
use crate::output::{CrawlRecord, ErrorKind, ErrorRecord, LinkRef, PageRecord};
use crate::state::{Claim, CrawlState};
use crate::url::{canonicalize, UrlPolicy};
use std::sync::Arc;
use url::Url;

/// What happened to one scheduled URL
#[derive(Debug)]
pub(crate) enum Visit {
    /// Beyond the depth bound or already claimed elsewhere
    Skipped,

    /// No page slots were left to claim the URL
    BudgetExhausted,

    /// The URL was claimed and a record stored; `links` are the eligible
    /// children as linked, minus fragments (always empty for error records)
    Recorded { links: Vec<Url> },
}

/// Everything a worker needs to process URLs of one run
pub(crate) struct CrawlContext<F> {
    pub(crate) config: Config,
    pub(crate) policy: UrlPolicy,
    pub(crate) fetcher: Arc<F>,
    pub(crate) observer: Arc<dyn CrawlObserver>,
    pub(crate) state: CrawlState,
}

impl<F: PageFetcher> CrawlContext<F> {
    /// Processes one URL found at `depth`
    ///
    /// `url` is fetched as given; its canonical form is the claim and
    /// record key.
    pub(crate) async fn visit(&self, url: &Url, depth: u32) -> Visit {
        if depth > self.config.crawler.max_depth {
            return Visit::Skipped;
        }

        let key = canonicalize(url);
        let claimed = match self.state.claim(key.as_str()) {
            Claim::Claimed { claimed } => claimed,
            Claim::AlreadyVisited => return Visit::Skipped,
            Claim::BudgetExhausted => return Visit::BudgetExhausted,
        };
        self.observer.page_claimed(url, depth, claimed);

        let (record, links) = match self.fetcher.fetch(url).await {
            Ok(page) => self.build_record(&key, depth, page),
            Err(e) => {
                let record = ErrorRecord {
                    url: key.to_string(),
                    depth,
                    error_message: e.to_string(),
                    kind: e.kind(),
                };
                (record.into(), Vec::new())
            }
        };

        self.observer.page_recorded(&record);
        self.state.record(record);

        Visit::Recorded { links }
    }

    /// Classifies a completed response and extracts it when it is an HTML page
    fn build_record(&self, key: &Url, depth: u32, page: FetchedPage) -> (CrawlRecord, Vec<Url>) {
        let error = |error_message: String, kind: ErrorKind| {
            let record = ErrorRecord {
                url: key.to_string(),
                depth,
                error_message,
                kind,
            };
            (CrawlRecord::from(record), Vec::new())
        };

        if page.is_redirect() {
            let location = page.location();
            return error(
                format!(
                    "Redirect not followed: HTTP {} to {}",
                    page.status,
                    location.as_deref().unwrap_or("<no location>")
                ),
                ErrorKind::Redirect {
                    status: page.status,
                    location,
                },
            );
        }

        if !page.is_success() {
            return error(
                format!("HTTP {}", page.status),
                ErrorKind::HttpStatus {
                    status: page.status,
                },
            );
        }

        if !page.is_html() {
            let content_type = if page.content_type.is_empty() {
                "<none>".to_string()
            } else {
                page.content_type.clone()
            };
            return error(
                format!("Expected HTML, got {}", content_type),
                ErrorKind::NonHtml {
                    content_type: page.content_type,
                },
            );
        }

        // The document is dropped before returning so it never lives across an await
        let extraction = extract(&page.body, &page.final_url);
        let links = self.eligible_links(&extraction.links);

        let record = PageRecord {
            url: key.to_string(),
            final_url: page.final_url.to_string(),
            title: extraction.title,
            meta_description: extraction.meta_description,
            meta_keywords: extraction.meta_keywords,
            headings: extraction.headings,
            body_text: extraction.body_text,
            body_length: extraction.body_length,
            links: extraction.links,
            images: extraction.images,
            status_code: page.status,
            content_type: page.content_type,
            elapsed_seconds: page.elapsed.as_secs_f64(),
            depth,
        };

        (record.into(), links)
    }

    /// Children admitted by the policy, in extraction order
    ///
    /// Only the fragment is dropped; the query is fetched exactly as linked.
    fn eligible_links(&self, links: &[LinkRef]) -> Vec<Url> {
        links
            .iter()
            .filter_map(|link| Url::parse(&link.href).ok())
            .filter(|candidate| self.policy.admits(candidate))
            .map(|mut candidate| {
                candidate.set_fragment(None);
                candidate
            })
            .collect()
    }
}
