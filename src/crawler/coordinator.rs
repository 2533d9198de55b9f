//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the checking process, including:
//! - Seeding the frontier from the run's seed URLs
//! - Dispatching checks under the global concurrency limit
//! - Expanding fetched pages into new tasks
//! - Streaming records to the aggregator and event consumers
//! - Handling interrupts

use crate::config::CrawlConfig;
use crate::crawler::events::CrawlEvent;
use crate::crawler::fetcher::{Fetch, FetchOutcome};
use crate::crawler::scheduler::{CrawlTask, Rejection, ScheduledFetch, Scheduler};
use crate::output::ResultAggregator;
use crate::state::{LinkRecord, VisitedSet};
use crate::url::{is_same_site, normalize, sanitize_line, SkipList};
use crate::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

/// What a finished check hands back to the run loop
type CheckResult = (CrawlTask, bool, FetchOutcome);

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetch> {
    config: Arc<CrawlConfig>,
    fetcher: Arc<F>,
    scheduler: Scheduler,
    skip_list: SkipList,
    events: Option<mpsc::UnboundedSender<CrawlEvent>>,
    shutdown: Option<watch::Receiver<bool>>,
    link_limit_warned: bool,
}

impl<F: Fetch> Coordinator<F> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The immutable configuration for this run
    /// * `fetcher` - The fetcher every check goes through
    pub fn new(config: CrawlConfig, fetcher: Arc<F>) -> Self {
        let scheduler = Scheduler::new(
            config.concurrency_limit,
            Arc::new(VisitedSet::new()),
            config.max_links,
        );
        let skip_list = SkipList::new(&config.skip_domains);

        Self {
            config: Arc::new(config),
            fetcher,
            scheduler,
            skip_list,
            events: None,
            shutdown: None,
            link_limit_warned: false,
        }
    }

    /// Streams progress events to `sender` while the crawl runs
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<CrawlEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Cancels the crawl once `shutdown` holds `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Runs the main crawl loop
    ///
    /// This is the core checking logic that:
    /// 1. Schedules the seed URLs at depth 0
    /// 2. Starts checks while the frontier has work and slots are free
    /// 3. Records each finished check as soon as it completes
    /// 4. Schedules the outbound links of scanned pages
    ///
    /// The run ends once the frontier is empty and no check is in flight, or
    /// when the shutdown signal fires. A cancelled run still returns every
    /// record collected before the signal.
    ///
    /// # Returns
    ///
    /// * `Ok(ResultAggregator)` - Records in completion order
    /// * `Err(RippleError)` - A worker panicked
    pub async fn run(mut self) -> Result<ResultAggregator> {
        let mut results = ResultAggregator::new();
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl of {} seed URLs (concurrency {}, timeout {}ms, recurse {})",
            self.config.seeds.len(),
            self.config.concurrency_limit,
            self.config.timeout_ms,
            self.config.recurse
        );

        self.schedule_seeds();

        let mut shutdown = self.shutdown.take();
        let mut in_flight: JoinSet<CheckResult> = JoinSet::new();
        let mut cancelled = shutdown.as_ref().is_some_and(|rx| *rx.borrow());

        while !cancelled {
            while let Some(scheduled) = self.scheduler.next_ready() {
                self.spawn_check(&mut in_flight, scheduled);
            }

            let mut signal_closed = false;
            let joined = match shutdown.as_mut() {
                Some(rx) => {
                    tokio::select! {
                        joined = in_flight.join_next() => Some(joined),
                        changed = rx.changed() => {
                            match changed {
                                Ok(()) => cancelled = *rx.borrow(),
                                Err(_) => signal_closed = true,
                            }
                            None
                        }
                    }
                }
                None => Some(in_flight.join_next().await),
            };

            if signal_closed {
                // Sender gone, nobody can cancel any more
                shutdown = None;
            }

            let joined = match joined {
                // Woken by the shutdown signal
                None => continue,
                // Frontier drained and nothing in flight
                Some(None) => break,
                Some(Some(joined)) => joined,
            };

            let (task, scanned, outcome) = joined?;
            self.complete(task, scanned, outcome, &mut results);

            if results.len() % 50 == 0 {
                let elapsed = start_time.elapsed();
                let rate = results.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} links checked, {} queued, {} in flight, {:.2} links/sec",
                    results.len(),
                    self.scheduler.frontier_size(),
                    self.scheduler.in_flight(),
                    rate
                );
            }
        }

        if cancelled {
            let abandoned = in_flight.len();
            in_flight.abort_all();
            while in_flight.join_next().await.is_some() {}
            let dropped = self.scheduler.clear();
            tracing::warn!(
                "Crawl cancelled: abandoned {} in-flight checks and {} queued links",
                abandoned,
                dropped
            );
            results.mark_cancelled();
        }

        results.finish();

        tracing::info!(
            "Crawl completed: {} links checked, {} broken in {:?}",
            results.len(),
            results.broken_count(),
            start_time.elapsed()
        );

        Ok(results)
    }

    /// Sanitizes, normalizes and schedules every seed URL
    fn schedule_seeds(&mut self) {
        let seeds = self.config.seeds.clone();
        for raw in &seeds {
            let url = match normalize(&sanitize_line(raw), None) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping invalid seed URL '{}': {}", raw, e);
                    continue;
                }
            };

            if self.skip_list.is_skipped(&url) {
                tracing::info!("Skipping seed URL {} (matches skip list)", url);
                continue;
            }

            self.enqueue(CrawlTask::seed(url));
        }
    }

    /// Starts one check on the runtime
    ///
    /// The permit moves into the spawned task so the slot stays taken until
    /// the fetch finishes or is aborted.
    fn spawn_check(&self, in_flight: &mut JoinSet<CheckResult>, scheduled: ScheduledFetch) {
        let ScheduledFetch { task, permit } = scheduled;
        let fetcher = Arc::clone(&self.fetcher);
        let timeout: Duration = self.config.timeout();
        let scan = self.should_expand(&task);

        if scan {
            tracing::info!("Scanning {}", task.url);
        }

        in_flight.spawn(async move {
            let _permit = permit;
            let outcome = fetcher.fetch(task.url.as_url(), timeout, scan).await;
            (task, scan, outcome)
        });
    }

    /// Whether the outbound links of `task`'s page are followed
    fn should_expand(&self, task: &CrawlTask) -> bool {
        if !self.config.recurse {
            return false;
        }

        if self.config.max_depth.is_some_and(|max| task.depth >= max) {
            return false;
        }

        !self.config.same_host_only || is_same_site(&task.url, &task.root)
    }

    /// Records a finished check and schedules what it discovered
    fn complete(
        &mut self,
        task: CrawlTask,
        scanned: bool,
        outcome: FetchOutcome,
        results: &mut ResultAggregator,
    ) {
        let record = LinkRecord::from_outcome(
            task.url.as_str(),
            task.parent.clone(),
            task.depth,
            &outcome,
        );

        if record.state.is_transport_failure() {
            tracing::debug!(
                "Checked {} -> {} ({})",
                record.url,
                record.state,
                record.detail.as_deref().unwrap_or_default()
            );
        } else {
            tracing::debug!(
                "Checked {} -> {} ({})",
                record.url,
                record.state,
                record.http_status.unwrap_or_default()
            );
        }

        results.record(record.clone());
        self.emit(CrawlEvent::Checked(record));

        if !scanned {
            return;
        }

        let links = outcome.links();
        self.emit(CrawlEvent::PageScanned {
            url: task.url.to_string(),
            links: links.len(),
        });

        for link in links {
            let url = match normalize(link, Some(task.url.as_url())) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Ignoring link '{}' on {}: {}", link, task.url, e);
                    continue;
                }
            };

            if self.skip_list.is_skipped(&url) {
                tracing::trace!("Skipping {} (matches skip list)", url);
                continue;
            }

            self.enqueue(task.child(url));
        }
    }

    fn enqueue(&mut self, task: CrawlTask) {
        let url = task.url.to_string();
        match self.scheduler.schedule(task) {
            Ok(()) => self.emit(CrawlEvent::Scheduled {
                url,
                total: self.scheduler.scheduled_count(),
            }),
            Err(Rejection::AlreadyVisited) => {}
            Err(Rejection::LinkLimitReached) => {
                if !self.link_limit_warned {
                    tracing::warn!(
                        "Link limit of {} reached, further links are not checked",
                        self.scheduler.scheduled_count()
                    );
                    self.link_limit_warned = true;
                }
            }
        }
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is watching progress
            let _ = events.send(event);
        }
    }
}
