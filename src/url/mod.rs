//! URL handling module for Link-Ripple
//!
//! This module turns raw link strings into canonical, comparable keys and
//! decides which hosts are excluded from checking.

mod matcher;
mod normalize;

// Re-export main functions
pub use matcher::{matches_wildcard, SkipList};
pub use normalize::{normalize, sanitize_line, NormalizedUrl};

/// Returns true if `url` is served from `host`
///
/// Scheme and port are ignored, so an `http://` seed that moves to
/// `https://` keeps its pages in scope.
pub fn is_same_site(url: &NormalizedUrl, host: &str) -> bool {
    url.host().eq_ignore_ascii_case(host)
}
