use crate::UrlError;
use url::Url;

/// Tracking query parameters removed during canonicalization
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Canonicalizes a URL into the form used as visited-set and result key
///
/// # Canonicalization Steps
///
/// 1. Remove the fragment (everything after #)
/// 2. Remove tracking query parameters (`utm_*`, `fbclid`, `gclid`, `mc_eid`)
/// 3. Sort the remaining query parameters by key (stable)
/// 4. Remove an empty query string (trailing ?)
///
/// Host lowercasing, default-port removal and dot-segment resolution are
/// already performed by the `url` parser. Paths are otherwise left alone:
/// `/docs` and `/docs/` resolve relative links differently and stay distinct.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitewalk::url::canonicalize;
///
/// let url = Url::parse("https://EXAMPLE.com/page?b=2&utm_source=x&a=1#top").unwrap();
/// assert_eq!(canonicalize(&url).as_str(), "https://example.com/page?a=1&b=2");
/// ```
pub fn canonicalize(url: &Url) -> Url {
    let mut url = url.clone();

    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    url
}

/// Parses and validates a seed URL
///
/// Seeds must be absolute `http`, `https` or `file` URLs; web seeds must
/// carry a host. The fragment is removed; the rest is kept as given so the
/// seed is fetched exactly as written. Its key is `canonicalize(&seed)`.
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    match url.scheme() {
        "http" | "https" => {
            if url.host_str().map_or(true, str::is_empty) {
                return Err(UrlError::MissingHost(seed.to_string()));
            }
        }
        "file" => {}
        other => {
            return Err(UrlError::InvalidScheme(format!(
                "Only http, https and file seeds are supported, got: {}",
                other
            )))
        }
    }

    url.set_fragment(None);
    Ok(url)
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
