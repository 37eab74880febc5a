//! Configuration type definitions.

use crate::constants::{DEFAULT_AUDIO_FORMATS, DEFAULT_GPS_FORMATS, DEFAULT_PARALLEL_JOBS, sheet};
use crate::timestamp::AruType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete run configuration.
///
/// Key names follow the deployment-sheet vocabulary used in the field
/// (`data_folder`, `deployment_sheet`, `delay_hours`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root folder holding one subdirectory per device.
    pub data_folder: PathBuf,

    /// Deployment sheet, relative to `data_folder` unless absolute.
    pub deployment_sheet: PathBuf,

    /// Recorder type, selects folder layout and filename convention.
    pub aru_type: AruType,

    /// Sheet column holding device/card ids (subdirectory names).
    pub subdirectories_column: String,

    /// Sheet column holding deployment times.
    pub deployment_time_column: String,

    /// Sheet column holding pickup times.
    pub pickup_time_column: String,

    /// strptime-style format of the sheet's time cells.
    pub datetime_format_str: String,

    /// Audio file extensions to match.
    pub audio_formats: Vec<String>,

    /// GPS companion file extensions to match.
    pub gps_formats: Vec<String>,

    /// Hours added to deployment and subtracted from pickup.
    pub delay_hours: Option<f64>,

    /// Worker threads per device.
    pub parallel_jobs: usize,

    /// Copy files instead of moving them.
    pub copy_files: bool,

    /// Top-level folders in `data_folder` that are not devices.
    pub ignore_directories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from("."),
            deployment_sheet: PathBuf::from(sheet::DEFAULT_FILE),
            aru_type: AruType::AudioMoth,
            subdirectories_column: sheet::DEVICE_COLUMN.to_string(),
            deployment_time_column: sheet::DEPLOYMENT_COLUMN.to_string(),
            pickup_time_column: sheet::PICKUP_COLUMN.to_string(),
            datetime_format_str: sheet::DATETIME_FORMAT.to_string(),
            audio_formats: DEFAULT_AUDIO_FORMATS.iter().map(ToString::to_string).collect(),
            gps_formats: DEFAULT_GPS_FORMATS.iter().map(ToString::to_string).collect(),
            delay_hours: None,
            parallel_jobs: DEFAULT_PARALLEL_JOBS,
            copy_files: false,
            ignore_directories: Vec::new(),
        }
    }
}

impl Config {
    /// Full path to the deployment sheet.
    pub fn sheet_path(&self) -> PathBuf {
        if self.deployment_sheet.is_absolute() {
            self.deployment_sheet.clone()
        } else {
            self.data_folder.join(&self.deployment_sheet)
        }
    }

    /// Glob patterns for the files processed in each device folder.
    pub fn file_patterns(&self) -> Vec<String> {
        self.audio_formats
            .iter()
            .chain(&self.gps_formats)
            .map(|ext| format!("*.{}", ext.trim_start_matches('.')))
            .collect()
    }
}
