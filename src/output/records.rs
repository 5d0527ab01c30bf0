//! Per-URL crawl records
//!
//! Every claimed URL ends the run mapped to exactly one [`CrawlRecord`]:
//! a [`PageRecord`] for an HTML page that was fetched and extracted, or an
//! [`ErrorRecord`] for anything that prevented that.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Heading text grouped by level (`"h1"` .. `"h6"`), in document order
pub type Headings = BTreeMap<String, Vec<String>>;

/// An outbound `<a href>` found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRef {
    /// Absolute URL (or the raw href when it could not be resolved)
    pub href: String,

    /// Trimmed anchor text
    pub anchor_text: String,

    /// The `title` attribute, empty if absent
    pub title: String,
}

/// An `<img>` found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    /// Absolute image URL, empty when the tag has no `src`
    pub src: String,

    /// The `alt` attribute, empty if absent
    pub alt: String,

    /// The `title` attribute, empty if absent
    pub title: String,
}

/// One successfully fetched HTML page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    /// Canonical URL the page was claimed under
    pub url: String,

    /// URL of the response after redirects
    pub final_url: String,

    pub title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub headings: Headings,

    /// Visible text with scripts and styles removed, whitespace collapsed
    pub body_text: String,

    /// Character count of `body_text`
    pub body_length: usize,

    pub links: Vec<LinkRef>,
    pub images: Vec<ImageRef>,

    pub status_code: u16,
    pub content_type: String,
    pub elapsed_seconds: f64,
    pub depth: u32,
}

/// Fields consumed by keyword and text analyzers
#[derive(Debug, Clone, Copy)]
pub struct ContentView<'a> {
    pub title: &'a str,
    pub meta_description: &'a str,
    pub body_text: &'a str,
    pub headings: &'a Headings,
}

impl PageRecord {
    /// Borrowed view of the textual content of the page
    pub fn content(&self) -> ContentView<'_> {
        ContentView {
            title: &self.title,
            meta_description: &self.meta_description,
            body_text: &self.body_text,
            headings: &self.headings,
        }
    }

    /// Headings of one level (1..=6); empty for unknown levels
    pub fn headings_at(&self, level: u8) -> &[String] {
        self.headings
            .get(&format!("h{}", level))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Why a claimed URL did not produce a page record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ErrorKind {
    /// The request exceeded the configured timeout
    Timeout,

    /// Connection could not be established (DNS, refused, TLS)
    Connect,

    /// Any other transport or I/O failure
    Transport,

    /// The server answered with a non-success status
    HttpStatus { status: u16 },

    /// A 3xx response was returned while redirects are disabled
    Redirect {
        status: u16,
        location: Option<String>,
    },

    /// The response was not HTML
    NonHtml { content_type: String },

    /// The worker processing this URL failed before recording a result
    Worker,
}

impl ErrorKind {
    /// Short stable label used in statistics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Transport => "transport",
            Self::HttpStatus { .. } => "http_status",
            Self::Redirect { .. } => "redirect",
            Self::NonHtml { .. } => "non_html",
            Self::Worker => "worker",
        }
    }
}

/// One claimed URL that failed
///
/// Serializes with `status_code: null` so page and error records share one
/// shape; the status of an HTTP error is carried by `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub url: String,
    pub depth: u32,
    pub error_message: String,
    pub kind: ErrorKind,
}

impl Serialize for ErrorRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ErrorRecord", 5)?;
        state.serialize_field("url", &self.url)?;
        state.serialize_field("depth", &self.depth)?;
        state.serialize_field("status_code", &None::<u16>)?;
        state.serialize_field("error_message", &self.error_message)?;
        state.serialize_field("kind", &self.kind)?;
        state.end()
    }
}

/// The record stored for a claimed URL
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum CrawlRecord {
    Page(PageRecord),
    Error(ErrorRecord),
}

impl CrawlRecord {
    /// The canonical URL this record is keyed by
    pub fn url(&self) -> &str {
        match self {
            Self::Page(page) => &page.url,
            Self::Error(error) => &error.url,
        }
    }

    /// Depth at which the URL was claimed
    pub fn depth(&self) -> u32 {
        match self {
            Self::Page(page) => page.depth,
            Self::Error(error) => error.depth,
        }
    }

    /// HTTP status of a page record; always `None` for error records
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Page(page) => Some(page.status_code),
            Self::Error(_) => None,
        }
    }

    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn as_page(&self) -> Option<&PageRecord> {
        match self {
            Self::Page(page) => Some(page),
            Self::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Page(_) => None,
            Self::Error(error) => Some(error),
        }
    }
}

impl From<PageRecord> for CrawlRecord {
    fn from(page: PageRecord) -> Self {
        Self::Page(page)
    }
}

impl From<ErrorRecord> for CrawlRecord {
    fn from(error: ErrorRecord) -> Self {
        Self::Error(error)
    }
}
