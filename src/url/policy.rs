use crate::config::PolicyConfig;
use crate::url::domain::{host_in_site, site_host};
use url::Url;

/// Eligibility rules for candidate links discovered during a crawl
///
/// A policy is bound to one site host and an ignore list of resource
/// extensions. It holds no mutable state, so one instance is shared by every
/// worker of a run.
#[derive(Debug, Clone)]
pub struct UrlPolicy {
    site_host: String,
    ignore_extensions: Vec<String>,
}

impl UrlPolicy {
    /// Creates a policy for the given site host
    ///
    /// Extensions are lowercased once here so the per-URL check does not
    /// allocate for them.
    pub fn new(site_host: impl Into<String>, ignore_extensions: &[String]) -> Self {
        Self {
            site_host: site_host.into().to_lowercase(),
            ignore_extensions: ignore_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    /// Creates a policy whose boundary is the seed's site host
    ///
    /// Seeds without a host (`file:` URLs) produce an empty boundary that
    /// admits no candidate, so only the seed itself is crawled.
    pub fn for_seed(seed: &Url, config: &PolicyConfig) -> Self {
        Self::new(site_host(seed).unwrap_or_default(), &config.ignore_extensions)
    }

    /// The site host this policy admits (with its subdomains)
    pub fn site_host(&self) -> &str {
        &self.site_host
    }

    /// Checks a candidate URL string against the policy
    pub fn is_eligible(&self, candidate: &str) -> bool {
        Url::parse(candidate)
            .map(|url| self.admits(&url))
            .unwrap_or(false)
    }

    /// Checks an already parsed candidate URL against the policy
    pub fn admits(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        let Some(host) = site_host(url) else {
            return false;
        };

        if !host_in_site(&host, &self.site_host) {
            return false;
        }

        !has_ignored_extension(url.path(), &self.ignore_extensions)
    }
}

/// Checks whether a candidate URL belongs to the crawl
///
/// A candidate is eligible when it:
/// - parses as an absolute `http`/`https` URL with a host
/// - is on `site_host` or one of its subdomains
/// - does not end in one of `ignore_extensions` (case-insensitive)
///
/// # Examples
///
/// ```
/// use sitewalk::url::is_eligible;
///
/// let ignore = vec![".pdf".to_string()];
/// assert!(is_eligible("https://example.com/about", "example.com", &ignore));
/// assert!(is_eligible("https://blog.example.com/", "example.com", &ignore));
/// assert!(!is_eligible("https://other.com/", "example.com", &ignore));
/// assert!(!is_eligible("https://example.com/report.PDF", "example.com", &ignore));
/// assert!(!is_eligible("javascript:void(0)", "example.com", &ignore));
/// ```
pub fn is_eligible(candidate: &str, site_host: &str, ignore_extensions: &[String]) -> bool {
    UrlPolicy::new(site_host, ignore_extensions).is_eligible(candidate)
}

/// Checks whether a path ends in one of the (lowercase) ignored extensions
pub fn has_ignored_extension(path: &str, ignore_extensions: &[String]) -> bool {
    let path = path.to_lowercase();
    ignore_extensions.iter().any(|ext| path.ends_with(ext.as_str()))
}
