use crate::output::stats::CrawlSummary;
use crate::state::{LinkRecord, LinkState};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Collects the records of one crawl run
///
/// Records are kept in the order they were emitted. The coordinator owns
/// the aggregator while the crawl runs, so appends never contend.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    records: Vec<LinkRecord>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    cancelled: bool,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultAggregator {
    /// Creates an empty aggregator; the run's start time is now
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
            cancelled: false,
        }
    }

    pub fn record(&mut self, entry: LinkRecord) {
        self.records.push(entry);
    }

    /// Returns the records to report, in emission order
    ///
    /// With `filter_broken_only` only broken records are returned (HTTP
    /// errors, timeouts and transport failures). Otherwise every record is.
    pub fn finalize(&self, filter_broken_only: bool) -> Vec<LinkRecord> {
        self.records
            .iter()
            .filter(|record| !filter_broken_only || record.is_broken())
            .cloned()
            .collect()
    }

    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    /// Total links checked
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total links classified broken
    pub fn broken_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_broken()).count()
    }

    pub fn count_by_state(&self) -> HashMap<LinkState, u64> {
        let mut counts = HashMap::new();
        for record in &self.records {
            *counts.entry(record.state).or_insert(0) += 1;
        }
        counts
    }

    /// Marks the run as interrupted before the frontier drained
    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Stamps the finish time; later calls keep the first stamp
    pub fn finish(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
    }

    /// Builds the run summary from the records collected so far
    pub fn summary(&self) -> CrawlSummary {
        let duration_ms = self
            .finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds());

        CrawlSummary {
            started_at: self.started_at,
            finished_at: self.finished_at,
            duration_ms,
            cancelled: self.cancelled,
            total_checked: self.records.len() as u64,
            total_broken: self.broken_count() as u64,
            links_by_state: self.count_by_state(),
            max_depth_reached: self.records.iter().map(|r| r.depth).max(),
        }
    }
}
