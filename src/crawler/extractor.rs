//! HTML extraction for page records
//!
//! This module turns a fetched HTML document into the content fields of a
//! page record:
//! - Title, meta description and meta keywords
//! - Heading text grouped by level
//! - Visible body text (scripts and styles excluded)
//! - Outbound links and image descriptors, resolved against the page URL
//!
//! Extraction is pure: it never fails, never does I/O and gives identical
//! output for identical input. Malformed markup is handled by the
//! html5ever-based parser in `scraper`.

use crate::output::{Headings, ImageRef, LinkRef};
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Heading levels extracted from every page
const HEADING_LEVELS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements whose text never counts as body text
const NON_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Content extracted from one HTML document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub headings: Headings,
    pub body_text: String,
    pub body_length: usize,
    pub links: Vec<LinkRef>,
    pub images: Vec<ImageRef>,
}

/// Parses HTML content and extracts the page record fields
///
/// # Extraction Rules
///
/// - Title: the first `<title>`, trimmed; empty if absent
/// - Meta: `content` of the first `<meta name="description">` /
///   `<meta name="keywords">` (name compared case-insensitively)
/// - Headings: trimmed text of every `h1`..`h6`, in document order per level
/// - Body text: every text node outside `<script>`/`<style>`, whitespace
///   collapsed to single spaces
/// - Links: every `<a href>`, resolved against `base_url`; duplicates kept
/// - Images: every `<img>`, `src` resolved against `base_url`
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL the document was served from
///
/// # Example
///
/// ```
/// use sitewalk::crawler::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let page = extract(html, &base_url);
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.links[0].href, "https://example.com/page");
/// ```
pub fn extract(html: &str, base_url: &Url) -> Extraction {
    let document = Html::parse_document(html);

    let body_text = extract_body_text(&document);
    let body_length = body_text.chars().count();

    Extraction {
        title: extract_title(&document),
        meta_description: extract_meta(&document, "description"),
        meta_keywords: extract_meta(&document, "keywords"),
        headings: extract_headings(&document),
        body_text,
        body_length,
        links: extract_links(&document, base_url),
        images: extract_images(&document, base_url),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Some(title_selector) = selector("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extracts the content of the first `<meta>` with the given name
fn extract_meta(document: &Html, name: &str) -> String {
    let Some(meta_selector) = selector("meta[name]") else {
        return String::new();
    };

    document
        .select(&meta_selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

/// Extracts heading text for all six levels
///
/// Every level is present in the result, empty when the page has none.
fn extract_headings(document: &Html) -> Headings {
    HEADING_LEVELS
        .iter()
        .map(|level| {
            let texts: Vec<String> = selector(level)
                .map(|heading_selector| {
                    document
                        .select(&heading_selector)
                        .map(|element| element_text(&element))
                        .collect()
                })
                .unwrap_or_default();
            (level.to_string(), texts)
        })
        .collect()
}

/// Collects visible text with whitespace collapsed
fn extract_body_text(document: &Html) -> String {
    let mut words: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| NON_TEXT_ELEMENTS.contains(&element.name()))
        });

        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

/// Extracts every `<a href>` with its anchor text and title
fn extract_links(document: &Html, base_url: &Url) -> Vec<LinkRef> {
    let Some(a_selector) = selector("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            Some(LinkRef {
                href: resolve(href, base_url),
                anchor_text: element_text(&element),
                title: attr_or_empty(&element, "title"),
            })
        })
        .collect()
}

/// Extracts every `<img>` descriptor
fn extract_images(document: &Html, base_url: &Url) -> Vec<ImageRef> {
    let Some(img_selector) = selector("img") else {
        return Vec::new();
    };

    document
        .select(&img_selector)
        .map(|element| ImageRef {
            src: element
                .value()
                .attr("src")
                .map(|src| resolve(src, base_url))
                .unwrap_or_default(),
            alt: attr_or_empty(&element, "alt"),
            title: attr_or_empty(&element, "title"),
        })
        .collect()
}

/// Resolves an href against the base URL
///
/// Unresolvable references are returned trimmed but otherwise verbatim;
/// the URL policy rejects them later.
fn resolve(href: &str, base_url: &Url) -> String {
    let href = href.trim();
    base_url
        .join(href)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Text content of an element, trimmed; inner whitespace is kept as written
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn attr_or_empty(element: &ElementRef<'_>, name: &str) -> String {
    element
        .value()
        .attr(name)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
