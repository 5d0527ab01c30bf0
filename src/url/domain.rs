use url::Url;

/// Extracts the site boundary authority from a URL
///
/// The authority is the lowercase host followed by `:port` when the URL
/// carries a non-default port, so `http://127.0.0.1:8080/` and
/// `http://127.0.0.1:9090/` are different sites.
///
/// # Arguments
///
/// * `url` - The URL to extract the authority from
///
/// # Returns
///
/// * `Some(String)` - The lowercase authority
/// * `None` - If the URL has no host (e.g. `file:` or `mailto:` URLs)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitewalk::url::site_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(site_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(site_host(&url), Some("localhost:8080".to_string()));
/// ```
pub fn site_host(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Checks whether an authority is the site host itself or one of its subdomains
///
/// Both arguments are expected to be lowercase. The subdomain test is a
/// suffix match on `.site`, so `notexample.com` is not part of `example.com`.
pub fn host_in_site(candidate: &str, site: &str) -> bool {
    if site.is_empty() {
        return false;
    }
    candidate == site
        || candidate
            .strip_suffix(site)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
