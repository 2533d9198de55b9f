//! Link-Ripple: a recursive broken-link checker
//!
//! This crate checks the reachability of a set of seed URLs, follows the links
//! found on fetched HTML pages, classifies every discovered link as reachable
//! or broken, and produces a structured report.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Link-Ripple operations
///
/// Individual link failures are never represented here; they are recorded as
/// [`LinkState`] values on the link's [`LinkRecord`]. Only failures at the
/// input and output boundaries, or a broken worker, abort a run.
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Crawl worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// Errors reading the seed list
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Seed file '{path}' does not exist")]
    Missing { path: String },

    #[error("Failed to read seed file '{path}': {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("Seed file '{path}' contains no usable URLs")]
    Empty { path: String },
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Empty URL")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Link-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::config::{Config, CrawlConfig};
pub use crate::crawler::{crawl, Coordinator, CrawlEvent, Fetch, FetchOutcome, HttpFetcher};
pub use crate::output::{CrawlSummary, ResultAggregator};
pub use crate::state::{LinkRecord, LinkState, VisitedSet};
pub use crate::url::{normalize, sanitize_line, NormalizedUrl};
