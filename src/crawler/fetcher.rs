//! Page fetcher implementation
//!
//! This module performs the single GET behind every crawled page:
//! - Building the HTTP client with the configured identity and headers
//! - Following (or not following) redirects per configuration
//! - Reading `file://` URLs from a local mirror
//! - Classifying transport failures into `FetchError` values
//!
//! Fetchers never touch crawl state; the scheduler decides what a response
//! means for the run.

use crate::config::HttpConfig;
use crate::output::ErrorKind;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

/// Accept header sent with every request
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Maximum redirect hops when redirects are followed
const MAX_REDIRECTS: usize = 10;

/// A completed response, whatever its status
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code (200 for local files)
    pub status: u16,

    /// Response headers
    pub headers: HeaderMap,

    /// Content-Type header value, empty if absent
    pub content_type: String,

    /// Decoded body; empty unless the response is a 2xx HTML page
    pub body: String,

    /// Time from request start until the body was read
    pub elapsed: Duration,
}

impl FetchedPage {
    /// True for HTML content types
    pub fn is_html(&self) -> bool {
        is_html_content_type(&self.content_type)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// The Location header of a redirect response
    pub fn location(&self) -> Option<String> {
        self.headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Transport-level failure for one URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

impl FetchError {
    /// The error record kind this failure maps to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Connect(_) => ErrorKind::Connect,
            Self::Request(_) | Self::Io { .. } | Self::UnsupportedScheme(_) => {
                ErrorKind::Transport
            }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        let message = error_chain(&e);
        if e.is_timeout() {
            Self::Timeout(message)
        } else if e.is_connect() {
            Self::Connect(message)
        } else {
            Self::Request(message)
        }
    }
}

/// Something that can retrieve a page for the scheduler
///
/// Implementations must be shareable across workers. A fetch returns
/// `Ok` for every completed response (including 4xx/5xx) and `Err` only for
/// transport failures.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sitewalk::config::HttpConfig;
/// use sitewalk::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    let redirect = if config.follow_redirects {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    Client::builder()
        .user_agent(config.client_identity.clone())
        .default_headers(headers)
        .timeout(config.timeout())
        .redirect(redirect)
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a shared `reqwest` client, with `file://` support
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_http(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let start = Instant::now();

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Only 2xx HTML is ever extracted; anything else is recorded from
        // its headers alone, so its body is never downloaded
        let body = if response.status().is_success() && is_html_content_type(&content_type) {
            response.text().await?
        } else {
            String::new()
        };

        Ok(FetchedPage {
            final_url,
            status,
            headers,
            content_type,
            body,
            elapsed: start.elapsed(),
        })
    }

    async fn fetch_file(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let start = Instant::now();

        let path = url
            .to_file_path()
            .map_err(|_| FetchError::Request(format!("Invalid file URL: {}", url)))?;

        let bytes = tokio::fs::read(&path).await.map_err(|source| FetchError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let content_type = content_type_for_path(&path);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));

        Ok(FetchedPage {
            final_url: url.clone(),
            status: 200,
            headers,
            content_type: content_type.to_string(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
            elapsed: start.elapsed(),
        })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => self.fetch_file(url).await,
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Checks whether a Content-Type value denotes an HTML document
pub fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

/// Infers the content type of a local file from its extension
fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "xhtml" => "application/xhtml+xml",
        "json" => "application/json",
        "txt" => "text/plain",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
}

/// Formats an error together with its source chain
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
