//! The result map returned by a crawl

use crate::output::records::{CrawlRecord, ErrorRecord, PageRecord};
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};

/// Map from canonical URL to the record produced for it
///
/// Keys are unique: the first record inserted for a URL wins and later
/// inserts for the same URL are rejected, so a URL can never hold both a
/// page and an error record. Iteration is ordered by URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultStore {
    records: BTreeMap<String, CrawlRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its own URL
    ///
    /// Returns `false` (and leaves the store unchanged) if the URL already
    /// has a record.
    pub fn insert(&mut self, record: impl Into<CrawlRecord>) -> bool {
        let record = record.into();
        match self.records.entry(record.url().to_string()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, url: &str) -> Option<&CrawlRecord> {
        self.records.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.records.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// URLs with a record, in order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CrawlRecord)> {
        self.records.iter().map(|(url, record)| (url.as_str(), record))
    }

    /// All successfully extracted pages
    pub fn pages(&self) -> impl Iterator<Item = &PageRecord> {
        self.records.values().filter_map(CrawlRecord::as_page)
    }

    /// All failed URLs
    pub fn errors(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.records.values().filter_map(CrawlRecord::as_error)
    }

    pub fn page_count(&self) -> usize {
        self.pages().count()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn into_inner(self) -> BTreeMap<String, CrawlRecord> {
        self.records
    }
}

impl IntoIterator for ResultStore {
    type Item = (String, CrawlRecord);
    type IntoIter = btree_map::IntoIter<String, CrawlRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
