//! HTML parser for extracting outbound links
//!
//! This module handles parsing HTML content to extract:
//! - Links in anchor and resource attributes
//! - The `<base href>` that relative links resolve against
//! - Page title

use scraper::{Html, Selector};
use url::Url;

/// Element/attribute pairs that hold a single URL
const LINK_ATTRIBUTES: &[(&str, &str)] = &[
    ("a", "href"),
    ("area", "href"),
    ("link", "href"),
    ("img", "src"),
    ("script", "src"),
    ("iframe", "src"),
    ("frame", "src"),
    ("embed", "src"),
    ("source", "src"),
    ("track", "src"),
    ("audio", "src"),
    ("video", "src"),
    ("video", "poster"),
    ("object", "data"),
    ("form", "action"),
];

/// Element/attribute pairs that hold a `srcset` candidate list
const SRCSET_ATTRIBUTES: &[(&str, &str)] = &[("img", "srcset"), ("source", "srcset")];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Value of the first `<base href>` on the page
    pub base_href: Option<String>,

    /// Link references as written in the page, in document order
    pub links: Vec<String>,
}

impl ParsedPage {
    /// Returns the page's links ready for normalization against `page_url`
    ///
    /// When the page declares `<base href>`, relative links are resolved
    /// against it here, because the page URL is no longer the right base.
    /// Otherwise links are returned exactly as written.
    pub fn outbound_links(&self, page_url: &Url) -> Vec<String> {
        let base = self
            .base_href
            .as_deref()
            .and_then(|href| page_url.join(href.trim()).ok());

        match base {
            Some(base) => self
                .links
                .iter()
                .map(|link| {
                    base.join(link.trim())
                        .map(|u| u.to_string())
                        .unwrap_or_else(|_| link.clone())
                })
                .collect(),
            None => self.links.clone(),
        }
    }
}

/// Parses HTML content and extracts links and metadata
///
/// # Link Extraction Rules
///
/// **Include:** URL-bearing attributes of anchors, areas, `<link>`, images
/// (including every `srcset` candidate), scripts, frames, media elements,
/// embedded objects and form actions.
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only references (same page anchors)
/// - Empty attributes
///
/// # Examples
///
/// ```
/// use link_ripple::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        base_href: extract_base_href(&document),
        links: extract_links(&document),
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

fn extract_base_href(document: &Html) -> Option<String> {
    let selector = Selector::parse("base[href]").ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Extracts all followable link references from the HTML document
fn extract_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    for (tag, attr) in LINK_ATTRIBUTES {
        let css = format!("{}[{}]", tag, attr);
        let Ok(selector) = Selector::parse(&css) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                if is_followable(value) {
                    links.push(value.trim().to_string());
                }
            }
        }
    }

    for (tag, attr) in SRCSET_ATTRIBUTES {
        let css = format!("{}[{}]", tag, attr);
        let Ok(selector) = Selector::parse(&css) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                links.extend(
                    parse_srcset(value)
                        .into_iter()
                        .filter(|candidate| is_followable(candidate)),
                );
            }
        }
    }

    links
}

/// Splits a `srcset` value into its candidate URLs
fn parse_srcset(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Returns false for references that are not network links
fn is_followable(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !(lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:"))
}
