use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// Characters that would corrupt a row of the comma-separated report
const REPORT_BREAKING_CHARS: &[char] = &[',', '"'];

/// A canonical, absolute HTTP(S) URL used as the deduplication key
///
/// Two links that normalize to the same `NormalizedUrl` are the same link
/// for the purposes of a crawl and are checked only once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the lowercase host of this URL
    pub fn host(&self) -> &str {
        // normalize() rejects URLs without a host, and the url crate lowercases
        // domain names while parsing
        self.0.host_str().unwrap_or_default()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<NormalizedUrl> for Url {
    fn from(url: NormalizedUrl) -> Self {
        url.0
    }
}

/// Strips characters that would corrupt a comma-separated report row
///
/// Applied to seed lines only. Every comma and double quote is removed, not
/// only the first one found, and surrounding whitespace is trimmed. Links
/// found on pages keep their commas; the report writer quotes them.
///
/// # Examples
///
/// ```
/// use link_ripple::url::sanitize_line;
///
/// assert_eq!(sanitize_line("  http://a.test/x,\"y\" "), "http://a.test/xy");
/// assert_eq!(sanitize_line("http://a.test/"), "http://a.test/");
/// ```
pub fn sanitize_line(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !REPORT_BREAKING_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalizes a raw link into a comparable key
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Reject the link if nothing is left
/// 3. Resolve it against `base` when given (absolute links pass through)
/// 4. Reject schemes other than HTTP and HTTPS, and URLs without a host
/// 5. Remove the fragment (everything after #)
///
/// Host lowercasing, dot-segment removal and the empty-path-becomes-`/` rule
/// come from the URL parser itself. Normalizing an already normalized URL
/// returns it unchanged.
///
/// # Arguments
///
/// * `raw` - The link as written in the seed file or the page
/// * `base` - The page the link was found on, if any
///
/// # Returns
///
/// * `Ok(NormalizedUrl)` - The canonical form of the link
/// * `Err(UrlError)` - The link is empty, malformed or not HTTP(S)
///
/// # Examples
///
/// ```
/// use link_ripple::url::normalize;
///
/// let url = normalize(" HTTP://A.TEST/docs/../page#top ", None).unwrap();
/// assert_eq!(url.as_str(), "http://a.test/page");
/// ```
pub fn normalize(raw: &str, base: Option<&Url>) -> UrlResult<NormalizedUrl> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = match base {
        Some(base) => base.join(cleaned),
        None => Url::parse(cleaned),
    };
    let mut url = parsed.map_err(|e| UrlError::Parse(format!("{}: {}", cleaned, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    url.set_fragment(None);

    Ok(NormalizedUrl(url))
}
