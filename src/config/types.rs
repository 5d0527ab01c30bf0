use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client identity sent when none is configured
pub const DEFAULT_CLIENT_IDENTITY: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Accept-Language header sent when none is configured
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Per-request timeout when none is configured
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Resource extensions that are never treated as crawlable pages
pub const DEFAULT_IGNORE_EXTENSIONS: &[&str] = &[
    // documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
    // images
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".ico",
    // archives
    ".zip", ".rar", ".7z", ".tar", ".gz",
    // executables
    ".exe", ".msi", ".dmg",
];

/// Main configuration structure for Sitewalk
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Traversal limits and strategy selection
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the seed (0 = seed page only)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages claimed during one run
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Politeness delay in seconds (between pages, or between levels when concurrent)
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: f64,

    /// Use the level-synchronized concurrent strategy
    pub concurrent: bool,

    /// Worker pool size for the concurrent strategy
    pub workers: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            max_pages: 100,
            delay_seconds: 1.0,
            concurrent: false,
            workers: 5,
        }
    }
}

impl CrawlerConfig {
    /// The politeness delay as a duration
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_seconds).unwrap_or(Duration::ZERO)
    }
}

/// HTTP client behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Value of the User-Agent header
    #[serde(rename = "client-identity")]
    pub client_identity: String,

    /// Value of the Accept-Language header
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: f64,

    /// Follow 3xx responses instead of returning them as-is
    #[serde(rename = "follow-redirects")]
    pub follow_redirects: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            client_identity: DEFAULT_CLIENT_IDENTITY.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS as f64,
            follow_redirects: true,
        }
    }
}

impl HttpConfig {
    /// The per-request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }
}

/// URL eligibility rules
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Path suffixes (case-insensitive) that mark a URL as a resource, not a page
    #[serde(rename = "ignore-extensions")]
    pub ignore_extensions: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            ignore_extensions: DEFAULT_IGNORE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}
