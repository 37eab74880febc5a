//! Recorder types and their folder/filename conventions.

use crate::constants::{FILENAME_TIMESTAMP_FORMAT, folders};
use crate::error::Error;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Autonomous recording unit type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AruType {
    /// AudioMoth: files directly in the card folder, named `YYYYMMDD_HHMMSS.WAV`.
    #[default]
    AudioMoth,
    /// Wildlife Acoustics Song Meter: files under `Data/`, named
    /// `<prefix>_YYYYMMDD_HHMMSS.wav`.
    Smm,
}

/// Where recordings live inside a device folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLayout {
    /// Directly inside the device folder.
    Flat,
    /// Inside the fixed `Data/` subfolder.
    Nested,
}

impl AruType {
    /// Folder layout used by this recorder.
    pub const fn layout(self) -> FileLayout {
        match self {
            Self::AudioMoth => FileLayout::Flat,
            Self::Smm => FileLayout::Nested,
        }
    }

    /// Folder holding the recordings of a device.
    pub fn recordings_dir(self, device_dir: &Path) -> PathBuf {
        match self.layout() {
            FileLayout::Flat => device_dir.to_path_buf(),
            FileLayout::Nested => device_dir.join(folders::NESTED_DATA),
        }
    }

    /// Parse the recording start encoded in a filename.
    ///
    /// Filename times are taken as UTC. Returns `None` if the name does not
    /// follow this recorder's convention.
    pub fn parse_filename(self, path: &Path) -> Option<DateTime<Utc>> {
        let stem = path.file_stem()?.to_str()?;

        let token = match self {
            Self::AudioMoth => stem.to_string(),
            Self::Smm => {
                let segments: Vec<&str> = stem.split('_').collect();
                if segments.len() < 2 {
                    return None;
                }
                segments[segments.len() - 2..].join("_")
            }
        };

        NaiveDateTime::parse_from_str(&token, FILENAME_TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

impl std::fmt::Display for AruType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AudioMoth => write!(f, "audio-moth"),
            Self::Smm => write!(f, "smm"),
        }
    }
}

impl std::str::FromStr for AruType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio-moth" => Ok(Self::AudioMoth),
            "smm" => Ok(Self::Smm),
            other => Err(Error::UnknownAruType {
                value: other.to_string(),
            }),
        }
    }
}
