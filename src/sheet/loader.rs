//! Deployment sheet parsing.
//!
//! Reads the deployment CSV with the `csv` crate. Only the three configured
//! columns are kept; every other column is ignored.

use super::window::{DeploymentWindow, is_missing_cell, parse_sheet_time};
use crate::config::Config;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Names of the sheet columns the resolver reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetColumns {
    /// Device/card id column.
    pub device: String,
    /// Deployment time column.
    pub deployment: String,
    /// Pickup time column.
    pub pickup: String,
}

impl SheetColumns {
    /// Column names from the run configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            device: config.subdirectories_column.clone(),
            deployment: config.deployment_time_column.clone(),
            pickup: config.pickup_time_column.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct SheetRow {
    device: String,
    deployment: String,
    pickup: String,
}

/// Loaded deployment sheet.
#[derive(Debug, Clone)]
pub struct DeploymentSheet {
    path: PathBuf,
    columns: SheetColumns,
    rows: Vec<SheetRow>,
}

impl DeploymentSheet {
    /// Load a deployment sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a configured column is
    /// missing from the header row.
    pub fn from_path(path: &Path, columns: SheetColumns) -> Result<Self> {
        let sheet_err = |source: csv::Error| Error::SheetRead {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(sheet_err)?;

        let headers = reader.headers().map_err(sheet_err)?.clone();
        let index_of = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| Error::MissingColumn {
                    column: column.to_string(),
                    path: path.to_path_buf(),
                })
        };
        let device_idx = index_of(&columns.device)?;
        let deployment_idx = index_of(&columns.deployment)?;
        let pickup_idx = index_of(&columns.pickup)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(sheet_err)?;
            let cell = |idx: usize| record.get(idx).unwrap_or_default().to_string();
            rows.push(SheetRow {
                device: cell(device_idx),
                deployment: cell(deployment_idx),
                pickup: cell(pickup_idx),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            columns,
            rows,
        })
    }

    /// Path the sheet was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Distinct non-empty device ids, in sheet order.
    pub fn device_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for row in &self.rows {
            if !is_missing_cell(&row.device) && !ids.contains(&row.device) {
                ids.push(row.device.clone());
            }
        }
        ids
    }

    /// Whether the sheet has at least one row for `device`.
    pub fn contains(&self, device: &str) -> bool {
        self.rows.iter().any(|row| row.device == device)
    }

    /// Resolve the deployment window of one device.
    ///
    /// Exactly one row must match. Empty cells give absent bounds; a
    /// non-empty cell that does not match `format` is an error. The buffer
    /// narrows the window on both present sides.
    pub fn resolve(
        &self,
        device: &str,
        format: &str,
        buffer_hours: Option<f64>,
    ) -> Result<DeploymentWindow> {
        let matches: Vec<&SheetRow> = self.rows.iter().filter(|r| r.device == device).collect();
        let row = match matches.as_slice() {
            [] => {
                return Err(Error::MissingDeviceRecord {
                    device: device.to_string(),
                });
            }
            [row] => *row,
            many => {
                return Err(Error::AmbiguousDeviceRecord {
                    device: device.to_string(),
                    count: many.len(),
                });
            }
        };

        let bound = |value: &str, column: &str| -> Result<_> {
            if is_missing_cell(value) {
                return Ok(None);
            }
            parse_sheet_time(value, format)
                .map(Some)
                .ok_or_else(|| Error::InvalidSheetTimestamp {
                    device: device.to_string(),
                    column: column.to_string(),
                    value: value.to_string(),
                    format: format.to_string(),
                })
        };

        let window = DeploymentWindow {
            deployment_time: bound(&row.deployment, &self.columns.deployment)?,
            pickup_time: bound(&row.pickup, &self.columns.pickup)?,
        };

        Ok(window.with_buffer(buffer_hours))
    }
}
