//! Error types for arutrim.

use std::path::PathBuf;

/// Result type alias for arutrim operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for arutrim.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Unrecognized recorder type tag.
    #[error("aru_type should be \"audio-moth\" or \"smm\", got \"{value}\"")]
    UnknownAruType {
        /// The rejected value.
        value: String,
    },

    /// Failed to read the deployment sheet.
    #[error("failed to read deployment sheet '{path}'")]
    SheetRead {
        /// Path to the sheet.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A configured column is not present in the deployment sheet.
    #[error("column '{column}' not present in deployment sheet '{path}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
        /// Path to the sheet.
        path: PathBuf,
    },

    /// No sheet row matches a device directory.
    #[error("no deployment record for device '{device}'")]
    MissingDeviceRecord {
        /// Device identifier.
        device: String,
    },

    /// More than one sheet row matches a device.
    #[error("{count} deployment records for device '{device}', expected exactly one")]
    AmbiguousDeviceRecord {
        /// Device identifier.
        device: String,
        /// Number of matching rows.
        count: usize,
    },

    /// A sheet cell holds a value that does not match the datetime format.
    #[error("device '{device}': cannot parse {column} value '{value}' with format '{format}'")]
    InvalidSheetTimestamp {
        /// Device identifier.
        device: String,
        /// Column the value came from.
        column: String,
        /// The offending cell.
        value: String,
        /// Configured datetime format.
        format: String,
    },

    /// Embedded recording metadata is missing or corrupt.
    #[error("cannot read recording metadata from '{path}': {reason}")]
    MetadataRead {
        /// Path to the audio file.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Neither metadata nor filename yields a usable timestamp, or the
    /// duration cannot be measured.
    #[error("file '{path}' is unreadable: {reason}")]
    FileUnreadable {
        /// Path to the audio file.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A different file already occupies the destination path.
    #[error("destination '{destination}' already exists and differs from '{source_path}'")]
    DestinationConflict {
        /// File that was being relocated.
        source_path: PathBuf,
        /// Occupied destination.
        destination: PathBuf,
    },

    /// Failed to create a destination directory.
    #[error("failed to create directory '{path}'")]
    DirCreateFailed {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to relocate a file.
    #[error("failed to relocate '{from}' to '{to}'")]
    Relocate {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the actions report.
    #[error("failed to write report '{path}'")]
    ReportWrite {
        /// Path to the report.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Another run holds the data folder lock.
    #[error("data folder is locked by {holder}; remove {path} if that run is gone")]
    DataFolderLocked {
        /// Path to the lock file.
        path: PathBuf,
        /// Who holds the lock, as read from the lock file.
        holder: String,
    },

    /// Failed to create lock file.
    #[error("failed to create lock file '{path}'")]
    LockCreate {
        /// Path to the lock file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to build the worker pool.
    #[error("failed to build worker pool: {reason}")]
    WorkerPool {
        /// Description of the failure.
        reason: String,
    },
}

impl Error {
    /// Whether this error belongs to the configuration group that aborts a
    /// run before any file is touched.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConfigDirNotFound
                | Self::ConfigRead { .. }
                | Self::ConfigParse { .. }
                | Self::ConfigValidation { .. }
                | Self::UnknownAruType { .. }
                | Self::SheetRead { .. }
                | Self::MissingColumn { .. }
                | Self::MissingDeviceRecord { .. }
                | Self::AmbiguousDeviceRecord { .. }
                | Self::InvalidSheetTimestamp { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_group() {
        let missing = Error::MissingDeviceRecord {
            device: "CARD01".to_string(),
        };
        assert!(missing.is_configuration());

        let conflict = Error::DestinationConflict {
            source_path: PathBuf::from("a.wav"),
            destination: PathBuf::from("b.wav"),
        };
        assert!(!conflict.is_configuration());
    }

    #[test]
    fn test_ambiguous_record_message() {
        let err = Error::AmbiguousDeviceRecord {
            device: "CARD01".to_string(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "2 deployment records for device 'CARD01', expected exactly one"
        );
    }
}
