//! CSV report adapter for value histories.

use chrono::{DateTime, SecondsFormat};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::domain::error::FolioError;
use crate::domain::valuation::ValueHistory;
use crate::ports::report_port::ReportPort;

pub const HEADER: [&str; 4] = ["timestamp", "date", "value", "invested"];

/// Writes to `output`, or to stdout when no path is set.
pub struct CsvReportAdapter {
    output: Option<PathBuf>,
}

impl CsvReportAdapter {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }
}

fn format_timestamp(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

pub fn write_history_to<W: Write>(writer: W, history: &ValueHistory) -> Result<(), FolioError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for (value, invested) in history.value.iter().zip(&history.invested) {
        wtr.write_record([
            value.timestamp.to_string(),
            format_timestamp(value.timestamp),
            format!("{:.2}", value.value),
            format!("{:.2}", invested.value),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write_history(&self, history: &ValueHistory) -> Result<(), FolioError> {
        match &self.output {
            Some(path) => {
                let file = File::create(path).map_err(|e| FolioError::Storage {
                    reason: format!("failed to create {}: {}", path.display(), e),
                })?;
                write_history_to(file, history)?;
                tracing::info!(path = %path.display(), rows = history.len(), "history written");
            }
            None => write_history_to(io::stdout().lock(), history)?,
        }
        Ok(())
    }
}
