use crate::state::LinkRecord;

/// Progress notifications emitted by a running crawl
///
/// Events are sent in the order the coordinator observes them. A consumer
/// that only wants the results can ignore everything except `Checked`.
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    /// A URL entered the frontier; `total` counts every URL scheduled so far
    Scheduled { url: String, total: usize },

    /// An HTML page was fetched and its outbound links extracted
    PageScanned { url: String, links: usize },

    /// A check finished and produced its record
    Checked(LinkRecord),
}
