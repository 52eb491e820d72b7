//! HTML content extraction
//!
//! Pure functions turning a raw HTML body into structured fields: title,
//! meta tags, absolute links, and text content. Extraction never fails the
//! pipeline; malformed HTML yields best-effort or empty fields.

use scraper::{Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Structured content extracted from one page
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    /// The page title, if a non-empty <title> was present
    pub title: Option<String>,

    /// Meta tags keyed by their name attribute, falling back to property
    pub meta_tags: BTreeMap<String, String>,

    /// Absolute http(s) links in document order
    pub links: Vec<String>,

    /// Whitespace-normalized text content
    pub text: String,
}

/// Extracts structured content from raw HTML
///
/// # Arguments
///
/// * `html` - The raw HTML body
/// * `base_url` - The page URL, used to resolve relative links
///
/// # Example
///
/// ```
/// use pagehaul::scraper::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let page = extract(html, &base_url);
/// assert_eq!(page.title, Some("Test".to_string()));
/// assert_eq!(page.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn extract(html: &str, base_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        title: extract_title(&document),
        meta_tags: extract_meta_tags(&document),
        links: extract_links(&document, base_url),
        text: extract_text(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts meta tags keyed by name, falling back to property
///
/// Tags with neither attribute, or without content, are skipped. On key
/// collision the first occurrence wins.
fn extract_meta_tags(document: &Html) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();

    if let Ok(meta_selector) = Selector::parse("meta") {
        for element in document.select(&meta_selector) {
            let key = element
                .value()
                .attr("name")
                .or_else(|| element.value().attr("property"));

            if let (Some(key), Some(content)) = (key, element.value().attr("content")) {
                tags.entry(key.to_string())
                    .or_insert_with(|| content.to_string());
            }
        }
    }

    tags
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Extracts the whitespace-normalized text content of the document
fn extract_text(document: &Html) -> String {
    let root_selector = match Selector::parse("html") {
        Ok(s) => s,
        Err(_) => return String::new(),
    };

    let Some(root) = document.select(&root_selector).next() else {
        return String::new();
    };

    root.text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
