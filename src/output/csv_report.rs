//! CSV report generation
//!
//! One row per checked link under the header `Link,Status,HTTP Code,Parent`.
//! Fields are quoted by the `csv` writer whenever they contain a delimiter
//! or quote, so a row can never split into extra columns.

use crate::output::error::{OutputError, OutputResult};
use crate::state::LinkRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const CSV_HEADERS: [&str; 4] = ["Link", "Status", "HTTP Code", "Parent"];

/// Writes the CSV report for `records` to `output_path`
///
/// # Arguments
///
/// * `records` - The records to report, in report order
/// * `output_path` - Path where the CSV file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to create or write the file
pub fn generate_csv_report(records: &[LinkRecord], output_path: &Path) -> OutputResult<()> {
    let file = File::create(output_path)?;
    write_csv(records, file)
}

/// Formats `records` as CSV text
pub fn format_csv_report(records: &[LinkRecord]) -> OutputResult<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| OutputError::Format(e.to_string()))
}

fn write_csv<W: Write>(records: &[LinkRecord], sink: W) -> OutputResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(sink);

    writer.write_record(CSV_HEADERS)?;
    for record in records {
        let http_code = record
            .http_status
            .map(|status| status.to_string())
            .unwrap_or_default();

        writer.write_record([
            record.url.as_str(),
            record.state.report_label(),
            http_code.as_str(),
            record.parent.as_deref().unwrap_or(""),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
