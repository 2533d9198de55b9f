//! Run summary statistics
//!
//! This module provides the summary of a finished crawl and prints it to
//! stdout once the run is over.

use crate::state::LinkState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Summary statistics for a crawl
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub cancelled: bool,

    // Overall statistics
    pub total_checked: u64,
    pub total_broken: u64,

    // State breakdown
    pub links_by_state: HashMap<LinkState, u64>,

    // Deepest link checked
    pub max_depth_reached: Option<u32>,
}

impl CrawlSummary {
    /// Number of links that ended in `state`
    pub fn count(&self, state: LinkState) -> u64 {
        self.links_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Returns the share of reachable links as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_checked == 0 {
            return 0.0;
        }
        (self.count(LinkState::Reachable) as f64 / self.total_checked as f64) * 100.0
    }

    /// The one-line result printed at the end of every run
    pub fn headline(&self) -> String {
        format!(
            "Detected {} broken links out of {} total links.",
            self.total_broken, self.total_checked
        )
    }
}

/// Prints the summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Link Check Summary ===\n");

    println!("Run:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = summary.duration_ms {
        println!("  Duration: {:.2} seconds", duration as f64 / 1000.0);
    }
    if summary.cancelled {
        println!("  Status: cancelled (partial results)");
    }
    println!();

    println!("Links by State:");
    for state in LinkState::all_states() {
        let count = summary.count(state);
        if count == 0 {
            continue;
        }
        let percentage = (count as f64 / summary.total_checked as f64) * 100.0;
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    if let Some(depth) = summary.max_depth_reached {
        println!("  Deepest link: depth {}", depth);
    }
    println!("  Success rate: {:.1}%", summary.success_rate());
    println!();

    println!("{}", summary.headline());
}
