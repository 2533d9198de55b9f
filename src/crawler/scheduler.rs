//! Scheduler for managing the crawl frontier and concurrency limiting
//!
//! This module handles:
//! - FIFO queue of links waiting to be checked
//! - Global concurrency limiting via semaphores
//! - At-most-once scheduling through the shared visited set
//! - The total-links safety valve

use crate::state::VisitedSet;
use crate::url::NormalizedUrl;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A URL queued for checking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The URL to check
    pub url: NormalizedUrl,

    /// The page this link was discovered on (None for seeds)
    pub parent: Option<String>,

    /// Distance from the seed (seeds are depth 0)
    pub depth: u32,

    /// Host of the seed this task descends from
    pub root: Arc<str>,
}

impl CrawlTask {
    /// Creates a depth-0 task for a seed URL
    pub fn seed(url: NormalizedUrl) -> Self {
        let root: Arc<str> = Arc::from(url.host());
        Self {
            url,
            parent: None,
            depth: 0,
            root,
        }
    }

    /// Creates a task for a link found on this task's page
    pub fn child(&self, url: NormalizedUrl) -> Self {
        Self {
            url,
            parent: Some(self.url.to_string()),
            depth: self.depth + 1,
            root: Arc::clone(&self.root),
        }
    }
}

/// A task cleared to run, holding one slot of the concurrency limit
///
/// The slot is released when this value (or its permit) is dropped.
pub struct ScheduledFetch {
    /// The task to run
    pub task: CrawlTask,

    /// The semaphore permit for this fetch
    pub permit: OwnedSemaphorePermit,
}

/// Why a link was not scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Already scheduled earlier in this run
    AlreadyVisited,
    /// The run has scheduled `max_links` URLs already
    LinkLimitReached,
}

/// Scheduler manages the frontier queue and concurrency
///
/// The scheduler coordinates:
/// - Global concurrency limits (simultaneous outbound checks)
/// - At-most-once scheduling of each normalized URL
/// - The optional cap on URLs scheduled per run
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global_semaphore: Arc<Semaphore>,

    /// Number of permits the semaphore started with
    concurrency_limit: usize,

    /// URLs already scheduled, shared with anyone inspecting the run
    visited: Arc<VisitedSet>,

    /// Frontier queue of tasks to check, in discovery order
    frontier: VecDeque<CrawlTask>,

    /// Maximum URLs ever scheduled in this run
    max_links: Option<usize>,

    /// Number of URLs scheduled so far
    scheduled: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `concurrency_limit` - Maximum checks in flight at once (at least 1)
    /// * `visited` - The run's visited set
    /// * `max_links` - Optional cap on the number of URLs scheduled
    pub fn new(concurrency_limit: usize, visited: Arc<VisitedSet>, max_links: Option<usize>) -> Self {
        let concurrency_limit = concurrency_limit.max(1);
        Self {
            global_semaphore: Arc::new(Semaphore::new(concurrency_limit)),
            concurrency_limit,
            visited,
            frontier: VecDeque::new(),
            max_links,
            scheduled: 0,
        }
    }

    /// Adds a task to the frontier unless its URL was already scheduled
    ///
    /// The URL is marked visited before it is queued, so a concurrent
    /// discovery of the same URL can never queue it a second time.
    pub fn schedule(&mut self, task: CrawlTask) -> Result<(), Rejection> {
        if self.max_links.is_some_and(|max| self.scheduled >= max) {
            return Err(Rejection::LinkLimitReached);
        }

        if !self.visited.try_mark_visited(&task.url) {
            return Err(Rejection::AlreadyVisited);
        }

        tracing::trace!("Scheduled {} at depth {}", task.url, task.depth);
        self.scheduled += 1;
        self.frontier.push_back(task);
        Ok(())
    }

    /// Gets the next task if a concurrency slot is free
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledFetch)` - A task and the permit it runs under
    /// * `None` - The frontier is empty or every slot is taken
    pub fn next_ready(&mut self) -> Option<ScheduledFetch> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = Arc::clone(&self.global_semaphore).try_acquire_owned().ok()?;
        let task = self.frontier.pop_front()?;

        Some(ScheduledFetch { task, permit })
    }

    /// Drops every queued task
    pub fn clear(&mut self) -> usize {
        let dropped = self.frontier.len();
        self.frontier.clear();
        dropped
    }

    /// Returns the number of tasks waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns the number of URLs scheduled so far (queued, running or done)
    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    /// Returns the number of checks currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.concurrency_limit - self.global_semaphore.available_permits()
    }
}
