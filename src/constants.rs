//! Application-wide constants.
//!
//! Folder names and report formats are defined here so the router, the
//! pipeline and the report writer agree on them.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "arutrim";

/// Per-user config file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Config file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "arutrim.toml";

/// Run lock file placed in the data folder.
pub const LOCK_FILE_NAME: &str = ".arutrim.lock";

/// Default worker count (sequential).
pub const DEFAULT_PARALLEL_JOBS: usize = 1;

/// Destination folder names, relative to the data folder.
pub mod folders {
    /// Files recorded inside the deployment window.
    pub const IN_PERIOD: &str = "in-period";
    /// Files recorded before deployment or after pickup.
    pub const OUT_OF_PERIOD: &str = "out-of-period";
    /// Leftovers of device directories that could not be fully processed.
    pub const NOT_PROCESSED: &str = "not-processed";
    /// Subfolder holding the recordings in the nested (SMM) layout.
    pub const NESTED_DATA: &str = "Data";
}

/// Deployment sheet defaults.
pub mod sheet {
    /// Default sheet file name.
    pub const DEFAULT_FILE: &str = "deployment-sheet.csv";
    /// Default device id column.
    pub const DEVICE_COLUMN: &str = "card_code";
    /// Default deployment time column.
    pub const DEPLOYMENT_COLUMN: &str = "dropoff_date";
    /// Default pickup time column.
    pub const PICKUP_COLUMN: &str = "pickup_date";
    /// Default strptime-style datetime format.
    pub const DATETIME_FORMAT: &str = "%m/%d/%y %H:%M";
}

/// Actions report constants.
pub mod report {
    /// File name prefix; the run date and `.csv` are appended.
    pub const FILE_PREFIX: &str = "_trimming-actions-";
    /// Timestamp format used in report cells.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    /// Sentinel written for absent timestamps.
    pub const MISSING: &str = "NA";
}

/// Recording filename timestamp format shared by both recorder types.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Default audio file extensions.
pub const DEFAULT_AUDIO_FORMATS: &[&str] = &["mp3", "wav", "WAV"];

/// Default GPS companion file extensions (localization arrays).
pub const DEFAULT_GPS_FORMATS: &[&str] = &["PPS", "pps", "CSV", "csv"];
