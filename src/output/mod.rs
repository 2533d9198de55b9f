//! Output module for collecting results and writing reports
//!
//! This module handles:
//! - Aggregating link records as the crawl produces them
//! - Writing the CSV or JSON report
//! - Summarizing the run

mod aggregator;
mod csv_report;
mod error;
mod json_report;
pub mod stats;

pub use aggregator::ResultAggregator;
pub use csv_report::{format_csv_report, generate_csv_report};
pub use error::{OutputError, OutputResult};
pub use json_report::{format_json_report, generate_json_report};
pub use stats::{print_summary, CrawlSummary};

use crate::state::LinkRecord;
use std::path::Path;

/// Report file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    /// Picks the format from the file extension; CSV unless `.json`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Writes the report for `records` in the format implied by `output_path`
///
/// # Arguments
///
/// * `records` - Finalized records, already filtered
/// * `summary` - The run summary (embedded in JSON reports)
/// * `output_path` - Destination file
///
/// # Returns
///
/// * `Ok(ReportFormat)` - The format that was written
/// * `Err(OutputError)` - Failed to write the report
pub fn write_report(
    records: &[LinkRecord],
    summary: &CrawlSummary,
    output_path: &Path,
) -> OutputResult<ReportFormat> {
    let format = ReportFormat::from_path(output_path);

    match format {
        ReportFormat::Csv => generate_csv_report(records, output_path)?,
        ReportFormat::Json => generate_json_report(records, summary, output_path)?,
    }

    tracing::info!(
        "Wrote {} records to {}",
        records.len(),
        output_path.display()
    );

    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_from_path() {
        assert_eq!(
            ReportFormat::from_path(Path::new("broken_links.csv")),
            ReportFormat::Csv
        );
        assert_eq!(
            ReportFormat::from_path(Path::new("out/REPORT.JSON")),
            ReportFormat::Json
        );
        assert_eq!(
            ReportFormat::from_path(Path::new("report")),
            ReportFormat::Csv
        );
    }

    #[test]
    fn test_write_report_picks_format() {
        let dir = tempfile::tempdir().unwrap();
        let results = ResultAggregator::new();
        let summary = results.summary();

        let csv_path = dir.path().join("r.csv");
        let json_path = dir.path().join("r.json");

        assert_eq!(
            write_report(&[], &summary, &csv_path).unwrap(),
            ReportFormat::Csv
        );
        assert_eq!(
            write_report(&[], &summary, &json_path).unwrap(),
            ReportFormat::Json
        );

        assert_eq!(
            std::fs::read_to_string(&csv_path).unwrap(),
            "Link,Status,HTTP Code,Parent\n"
        );
        assert!(std::fs::read_to_string(&json_path)
            .unwrap()
            .contains("\"links\": []"));
    }
}
