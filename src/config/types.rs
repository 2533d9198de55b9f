use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Link-Ripple
///
/// Every table and key is optional; an empty file yields [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub skip: Vec<DomainEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Follow links found on fetched HTML pages
    pub recurse: bool,

    /// Per-request timeout (milliseconds)
    pub timeout_ms: u64,

    /// Maximum number of checks in flight at once
    pub concurrency_limit: u32,

    /// Links deeper than this are checked but not expanded
    pub max_depth: Option<u32>,

    /// Maximum number of URLs checked in one run
    pub max_links: Option<usize>,

    /// Only expand pages on the same host as their seed
    pub same_host_only: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            recurse: true,
            timeout_ms: 10_000,
            concurrency_limit: 100,
            max_depth: None,
            max_links: None,
            same_host_only: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    pub fn user_agent_string(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the report file (`.json` selects the JSON format)
    pub report_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: "broken_links.csv".to_string(),
        }
    }
}

/// Domain entry for the skip list
#[derive(Debug, Clone, Deserialize)]
pub struct DomainEntry {
    /// Domain pattern (e.g., "example.com" or "*.example.com")
    pub domain: String,
}

/// Immutable settings for one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Seed URLs as read, before normalization
    pub seeds: Vec<String>,
    pub recurse: bool,
    pub timeout_ms: u64,
    pub concurrency_limit: usize,
    /// Report only broken links
    pub filter_broken_only: bool,
    pub max_depth: Option<u32>,
    pub max_links: Option<usize>,
    pub same_host_only: bool,
    /// Host patterns that are never checked
    pub skip_domains: Vec<String>,
}

impl CrawlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Config::default().crawl_config(Vec::new(), true)
    }
}

impl Config {
    /// Builds the settings for a run over `seeds`
    pub fn crawl_config(&self, seeds: Vec<String>, filter_broken_only: bool) -> CrawlConfig {
        CrawlConfig {
            seeds,
            recurse: self.crawler.recurse,
            timeout_ms: self.crawler.timeout_ms,
            concurrency_limit: self.crawler.concurrency_limit as usize,
            filter_broken_only,
            max_depth: self.crawler.max_depth,
            max_links: self.crawler.max_links,
            same_host_only: self.crawler.same_host_only,
            skip_domains: self.skip.iter().map(|entry| entry.domain.clone()).collect(),
        }
    }
}
