//! Crawler module for link checking
//!
//! This module contains the core checking logic, including:
//! - HTTP fetching with HEAD requests and GET fallback
//! - HTML parsing and link extraction
//! - Frontier scheduling and concurrency limiting
//! - Overall crawl coordination

mod coordinator;
mod events;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::Coordinator;
pub use events::CrawlEvent;
pub use fetcher::{build_http_client, Fetch, FetchOutcome, HttpFetcher};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::{CrawlTask, Rejection, ScheduledFetch, Scheduler};

use crate::config::CrawlConfig;
use crate::output::ResultAggregator;
use crate::Result;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for checking a seed set without observing
/// progress. It will:
/// 1. Schedule the seed URLs
/// 2. Check every link under the concurrency limit
/// 3. Follow the links of scanned pages when recursion is enabled
/// 4. Collect every record into an aggregator
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `fetcher` - The fetcher every check goes through
///
/// # Returns
///
/// * `Ok(ResultAggregator)` - Crawl completed
/// * `Err(RippleError)` - A worker failed
pub async fn crawl<F: Fetch>(
    config: CrawlConfig,
    fetcher: Arc<F>,
) -> Result<ResultAggregator> {
    Coordinator::new(config, fetcher).run().await
}
