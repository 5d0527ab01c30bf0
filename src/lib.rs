//! Sitewalk: a bounded site traversal engine
//!
//! This crate starts from a seed URL, discovers reachable pages inside the
//! seed's site boundary, bounds exploration by depth and page budget, and
//! returns a map from canonical URL to a page record or an error record.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitewalk operations
///
/// Per-page failures never surface here; they become error records in the
/// result store. These variants only describe failures that prevent a run
/// from starting (or engine bugs).
#[derive(Debug, Error)]
pub enum SitewalkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunState,
        to: state::RunState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Sitewalk operations
pub type Result<T> = std::result::Result<T, SitewalkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    crawl, CrawlObserver, Crawler, HttpFetcher, NoopObserver, PageFetcher, Strategy, TracingObserver,
};
pub use output::{CrawlRecord, CrawlReport, ErrorRecord, PageRecord, ResultStore};
pub use state::{CrawlOutcome, RunState};
pub use url::{canonicalize, is_eligible, UrlPolicy};
