use crate::output::error::OutputResult;
use crate::output::stats::CrawlSummary;
use crate::state::LinkRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a CrawlSummary,
    links: &'a [LinkRecord],
}

/// Writes the JSON report (summary plus records) to `output_path`
pub fn generate_json_report(
    records: &[LinkRecord],
    summary: &CrawlSummary,
    output_path: &Path,
) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(
        &mut writer,
        &JsonReport {
            summary,
            links: records,
        },
    )?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn format_json_report(records: &[LinkRecord], summary: &CrawlSummary) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(&JsonReport {
        summary,
        links: records,
    })?)
}
