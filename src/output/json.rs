//! JSON export of crawl reports

use crate::output::report::CrawlReport;
use crate::SitewalkError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializes a report as pretty-printed JSON
pub fn to_json(report: &CrawlReport) -> Result<String, SitewalkError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes a report as pretty-printed JSON to `path`, replacing any existing file
pub fn write_report(report: &CrawlReport, path: &Path) -> Result<(), SitewalkError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
