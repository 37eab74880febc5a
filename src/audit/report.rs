//! Dated CSV report of an audit log.

use crate::audit::{AuditLog, AuditRecord};
use crate::classify::Outcome;
use crate::constants::report;
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Location of the report for a run on `date`.
pub fn report_path(data_folder: &Path, date: NaiveDate) -> PathBuf {
    data_folder.join(format!(
        "{}{}.csv",
        report::FILE_PREFIX,
        date.format("%Y-%m-%d")
    ))
}

const COLUMNS: [&str; 9] = [
    "sub_dir",
    "action",
    "file",
    "audio_start",
    "audio_end",
    "deployment_time",
    "pickup_time",
    "destination",
    "relocation_error",
];

#[derive(Debug, Serialize)]
struct ReportRow {
    sub_dir: String,
    action: Outcome,
    file: String,
    audio_start: String,
    audio_end: String,
    deployment_time: String,
    pickup_time: String,
    destination: String,
    relocation_error: String,
}

impl From<&AuditRecord> for ReportRow {
    fn from(record: &AuditRecord) -> Self {
        let file = record
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let destination = record
            .placement
            .destination()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let relocation_error = record.placement.error().unwrap_or_default().to_string();

        if record.outcome.is_directory_level() {
            return Self {
                sub_dir: record.device.clone(),
                action: record.outcome,
                file,
                audio_start: String::new(),
                audio_end: String::new(),
                deployment_time: String::new(),
                pickup_time: String::new(),
                destination,
                relocation_error,
            };
        }

        let window = record.window.unwrap_or_default();
        Self {
            sub_dir: record.device.clone(),
            action: record.outcome,
            file,
            audio_start: format_time(record.interval.map(|i| i.start)),
            audio_end: format_time(record.interval.map(|i| i.end)),
            deployment_time: format_time(window.deployment_time),
            pickup_time: format_time(window.pickup_time),
            destination,
            relocation_error,
        }
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || report::MISSING.to_string(),
        |t| t.format(report::TIMESTAMP_FORMAT).to_string(),
    )
}

impl AuditLog {
    /// Write the log as CSV, one row per record, in the current order.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let report_err = |source: csv::Error| Error::ReportWrite {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::Writer::from_path(path).map_err(report_err)?;
        if self.is_empty() {
            // serde only emits the header together with the first row
            writer.write_record(COLUMNS).map_err(report_err)?;
        }
        for record in self.records() {
            writer
                .serialize(ReportRow::from(record))
                .map_err(report_err)?;
        }
        writer.flush()?;
        Ok(())
    }
}
