//! Single audit entries.

use crate::classify::Outcome;
use crate::router::Relocation;
use crate::sheet::DeploymentWindow;
use crate::timestamp::RecordingInterval;
use std::path::{Path, PathBuf};

/// Where a record's file ended up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Placement {
    /// Not relocated: the outcome keeps files where they are.
    #[default]
    InPlace,
    /// Relocated, or planned to be in a dry run.
    Relocated(Relocation),
    /// Relocation or cleanup failed; the message says why.
    Failed(String),
}

impl Placement {
    /// Destination of a relocated file.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Self::Relocated(relocation) => Some(relocation.destination()),
            Self::InPlace | Self::Failed(_) => None,
        }
    }

    /// Failure message, if relocation failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::InPlace | Self::Relocated(_) => None,
        }
    }
}

/// One decision: a processed file or a device directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// Device/card id.
    pub device: String,
    /// Decision taken.
    pub outcome: Outcome,
    /// File the decision applies to. For a partial directory this is the
    /// folder holding the quarantined leftovers.
    pub file: Option<PathBuf>,
    /// Recording interval, when it could be read.
    pub interval: Option<RecordingInterval>,
    /// Deployment window the file was compared against.
    pub window: Option<DeploymentWindow>,
    /// What happened to the file after classification.
    pub placement: Placement,
}

impl AuditRecord {
    /// Record for a processed file.
    pub fn for_file(
        device: &str,
        outcome: Outcome,
        file: PathBuf,
        interval: Option<RecordingInterval>,
        window: DeploymentWindow,
    ) -> Self {
        Self {
            device: device.to_string(),
            outcome,
            file: Some(file),
            interval,
            window: Some(window),
            placement: Placement::InPlace,
        }
    }

    /// Sparse record for a device directory.
    pub fn for_directory(device: &str, outcome: Outcome, file: Option<PathBuf>) -> Self {
        Self {
            device: device.to_string(),
            outcome,
            file,
            interval: None,
            window: None,
            placement: Placement::InPlace,
        }
    }

    /// Same record with `placement` set.
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Whether relocating or cleaning up after this record failed.
    pub const fn is_failed(&self) -> bool {
        matches!(self.placement, Placement::Failed(_))
    }
}
