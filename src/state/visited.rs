use crate::url::NormalizedUrl;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of URLs already scheduled for checking during one run
///
/// The set only grows. A URL is inserted before its check is scheduled, so
/// a URL reached from several pages at once is still checked exactly once.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically inserts `url` if absent
    ///
    /// # Returns
    ///
    /// * `true` - The caller now owns checking this URL
    /// * `false` - Another task already owns or has completed it
    pub fn try_mark_visited(&self, url: &NormalizedUrl) -> bool {
        // A panic while holding the lock cannot leave the set half-updated
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
