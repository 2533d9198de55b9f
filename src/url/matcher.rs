use super::NormalizedUrl;

/// Checks if a host matches a wildcard pattern
///
/// Two kinds of pattern are supported:
/// 1. Exact match: "example.com" matches only "example.com"
/// 2. Wildcard match: "*.example.com" matches "example.com" itself and any
///    subdomain of it, however deeply nested
///
/// Both sides are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use link_ripple::url::matches_wildcard;
///
/// assert!(matches_wildcard("example.com", "example.com"));
/// assert!(matches_wildcard("*.example.com", "api.v2.example.com"));
/// assert!(!matches_wildcard("*.example.com", "notexample.com"));
/// ```
pub fn matches_wildcard(pattern: &str, host: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            host == base
                || host
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => host == pattern,
    }
}

/// Set of host patterns whose links are never checked
#[derive(Debug, Clone, Default)]
pub struct SkipList {
    patterns: Vec<String>,
}

impl SkipList {
    /// Builds a skip list, lowercasing every pattern
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Returns true if the URL's host matches any pattern
    pub fn is_skipped(&self, url: &NormalizedUrl) -> bool {
        let host = url.host();
        self.patterns.iter().any(|p| matches_wildcard(p, host))
    }
}
