//! Configuration module for Link-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, reading the seed list, and building the per-run [`CrawlConfig`].
//!
//! # Example
//!
//! ```no_run
//! use link_ripple::config::{load_config, load_seed_urls};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("link-ripple.toml")).unwrap();
//! let seeds = load_seed_urls(Path::new("links.txt")).unwrap();
//! let run = config.crawl_config(seeds, true);
//! println!("Checking with {} concurrent requests", run.concurrency_limit);
//! ```

mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, CrawlerConfig, DomainEntry, OutputConfig, UserAgentConfig};

// Re-export loader functions
pub use parser::load_config;
pub use seeds::{load_seed_urls, parse_seed_list};
pub use validation::validate;
