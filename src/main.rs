//! Link-Ripple main entry point
//!
//! This is the command-line interface for the Link-Ripple broken-link checker.

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use link_ripple::config::{load_config, load_seed_urls, validate, Config, CrawlConfig};
use link_ripple::crawler::{Coordinator, CrawlEvent, HttpFetcher};
use link_ripple::output::{print_summary, write_report};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

/// Link-Ripple: a recursive broken-link checker
///
/// Link-Ripple checks every URL in the seed file, follows the links found on
/// the HTML pages it fetches, and writes a report of the links it checked.
#[derive(Parser, Debug)]
#[command(name = "link-ripple")]
#[command(version)]
#[command(about = "A recursive broken-link checker", long_about = None)]
struct Cli {
    /// Newline-delimited file of seed URLs
    #[arg(value_name = "SEED_FILE", default_value = "links.txt")]
    seed_file: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Report path (`.json` writes JSON, anything else CSV)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Report only broken links without asking
    #[arg(long, conflicts_with = "all")]
    broken_only: bool,

    /// Report every checked link without asking
    #[arg(long, conflicts_with = "broken_only")]
    all: bool,

    /// Check the seed URLs only, without following their links
    #[arg(long)]
    no_recurse: bool,

    /// Per-request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Maximum number of checks in flight at once
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Do not follow links found deeper than this
    #[arg(long, value_name = "DEPTH")]
    max_depth: Option<u32>,

    /// Stop scheduling after this many links
    #[arg(long, value_name = "N")]
    max_links: Option<usize>,

    /// Validate settings and seeds without checking anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if self.no_recurse {
            config.crawler.recurse = false;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.crawler.timeout_ms = timeout_ms;
        }
        if let Some(concurrency) = self.concurrency {
            config.crawler.concurrency_limit = concurrency;
        }
        if self.max_depth.is_some() {
            config.crawler.max_depth = self.max_depth;
        }
        if self.max_links.is_some() {
            config.crawler.max_links = self.max_links;
        }
        if let Some(output) = &self.output {
            config.output.report_path = output.to_string_lossy().into_owned();
        }
    }

    /// The filter choice given on the command line, if any
    fn filter_choice(&self) -> Option<bool> {
        if self.broken_only {
            Some(true)
        } else if self.all {
            Some(false)
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid settings")?;

    // Seed problems are fatal before any request goes out
    let seeds = load_seed_urls(&cli.seed_file).context("Cannot start crawl")?;
    tracing::info!(
        "Loaded {} seed URLs from {}",
        seeds.len(),
        cli.seed_file.display()
    );

    if cli.dry_run {
        handle_dry_run(&config, &seeds);
        return Ok(());
    }

    let filter_broken_only = match cli.filter_choice() {
        Some(choice) => choice,
        None => ask_filter_broken_only().await?,
    };

    let crawl_config = config.crawl_config(seeds, filter_broken_only);
    handle_crawl(&config, crawl_config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_ripple=info,warn"),
            1 => EnvFilter::new("link_ripple=debug,info"),
            2 => EnvFilter::new("link_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be checked
fn handle_dry_run(config: &Config, seeds: &[String]) {
    println!("=== Link-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Recurse: {}", config.crawler.recurse);
    println!("  Timeout: {}ms", config.crawler.timeout_ms);
    println!("  Concurrency limit: {}", config.crawler.concurrency_limit);
    match config.crawler.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }
    match config.crawler.max_links {
        Some(links) => println!("  Max links: {}", links),
        None => println!("  Max links: unlimited"),
    }
    println!("  Same host only: {}", config.crawler.same_host_only);

    println!("\nUser Agent: {}", config.user_agent.user_agent_string());
    println!("Report: {}", config.output.report_path);

    println!("\nSkipped Domains ({}):", config.skip.len());
    for entry in &config.skip {
        println!("  - {}", entry.domain);
    }

    println!("\nSeed URLs ({}):", seeds.len());
    for seed in seeds {
        match link_ripple::normalize(seed, None) {
            Ok(url) => println!("  * {}", url),
            Err(e) => println!("  ! {} ({})", seed, e),
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, crawl_config: CrawlConfig, quiet: bool) -> anyhow::Result<()> {
    let filter_broken_only = crawl_config.filter_broken_only;
    let report_path = PathBuf::from(&config.output.report_path);

    let fetcher =
        Arc::new(HttpFetcher::new(&config.user_agent).context("Failed to build HTTP client")?);
    let shutdown = setup_shutdown_handler();
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let crawl = tokio::spawn(
        Coordinator::new(crawl_config, fetcher)
            .with_events(events_tx)
            .with_shutdown(shutdown)
            .run(),
    );

    track_progress(events_rx, quiet).await;

    let results = crawl.await.context("Crawl task failed")??;
    let summary = results.summary();

    if quiet {
        println!("{}", summary.headline());
    } else {
        println!();
        print_summary(&summary);
    }

    let records = results.finalize(filter_broken_only);
    write_report(&records, &summary, &report_path)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;

    if !quiet {
        println!("Report written to: {}", report_path.display());
    }

    Ok(())
}

/// Drives the progress bar until the crawl closes the event stream
async fn track_progress(mut events: mpsc::UnboundedReceiver<CrawlEvent>, quiet: bool) {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} links ({msg} broken)")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    progress.set_message("0");

    let mut broken = 0usize;
    while let Some(event) = events.recv().await {
        match event {
            CrawlEvent::Scheduled { total, .. } => progress.set_length(total as u64),
            CrawlEvent::PageScanned { url, links } => {
                tracing::debug!("Found {} links on {}", links, url);
            }
            CrawlEvent::Checked(record) => {
                if record.is_broken() {
                    broken += 1;
                    progress.set_message(broken.to_string());
                }
                progress.inc(1);
            }
        }
    }

    progress.finish_and_clear();
}

/// Flips the shutdown flag on the first Ctrl+C; a second one exits at once
fn setup_shutdown_handler() -> watch::Receiver<bool> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nReceived Ctrl+C, stopping crawl and reporting partial results...");
            eprintln!("Press Ctrl+C again to force quit");
            let _ = shutdown_tx.send(true);

            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nForce quit requested, exiting immediately...");
                std::process::exit(130);
            }
        }
    });

    shutdown_rx
}

/// Asks on the terminal whether to report only broken links
///
/// Stdin is read on the blocking pool so no runtime worker stalls on it.
async fn ask_filter_broken_only() -> anyhow::Result<bool> {
    let answer = tokio::task::spawn_blocking(|| {
        prompt_filter_broken_only(std::io::stdin().lock(), std::io::stdout())
    })
    .await
    .context("Prompt task failed")?;

    answer.context("Failed to read answer")
}

/// Prompts on `output` until `input` yields a yes/no answer
fn prompt_filter_broken_only<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> std::io::Result<bool> {
    loop {
        write!(output, "Do you want to filter only broken links? (yes/no) [yes]: ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            // No input available, keep the default
            return Ok(true);
        }

        match parse_filter_answer(&answer) {
            Some(choice) => return Ok(choice),
            None => writeln!(output, "Please answer 'yes' or 'no'.")?,
        }
    }
}

/// Interprets an answer to the filter prompt; blank means yes
fn parse_filter_answer(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_answer() {
        assert_eq!(parse_filter_answer("\n"), Some(true));
        assert_eq!(parse_filter_answer("yes\n"), Some(true));
        assert_eq!(parse_filter_answer(" Y "), Some(true));
        assert_eq!(parse_filter_answer("no"), Some(false));
        assert_eq!(parse_filter_answer("N\r\n"), Some(false));
        assert_eq!(parse_filter_answer("maybe"), None);
    }

    #[test]
    fn test_prompt_repeats_until_answered() {
        let mut shown = Vec::new();
        let choice =
            prompt_filter_broken_only(std::io::Cursor::new("maybe\nno\n"), &mut shown).unwrap();

        assert!(!choice);
        let shown = String::from_utf8(shown).unwrap();
        assert_eq!(shown.matches("(yes/no)").count(), 2);
        assert!(shown.contains("Please answer 'yes' or 'no'."));
    }

    #[test]
    fn test_prompt_defaults_to_yes_without_input() {
        let choice = prompt_filter_broken_only(std::io::Cursor::new(""), Vec::new()).unwrap();
        assert!(choice);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["link-ripple"]).unwrap();

        assert_eq!(cli.seed_file, PathBuf::from("links.txt"));
        assert!(cli.config.is_none());
        assert_eq!(cli.filter_choice(), None);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "link-ripple",
            "seeds.txt",
            "--output",
            "out.json",
            "--no-recurse",
            "--timeout-ms",
            "500",
            "--concurrency",
            "8",
            "--max-depth",
            "2",
            "--broken-only",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert!(!config.crawler.recurse);
        assert_eq!(config.crawler.timeout_ms, 500);
        assert_eq!(config.crawler.concurrency_limit, 8);
        assert_eq!(config.crawler.max_depth, Some(2));
        assert_eq!(config.crawler.max_links, None);
        assert_eq!(config.output.report_path, "out.json");
        assert_eq!(cli.filter_choice(), Some(true));
    }

    #[test]
    fn test_cli_filter_flags_conflict() {
        assert!(Cli::try_parse_from(["link-ripple", "--broken-only", "--all"]).is_err());
    }
}
