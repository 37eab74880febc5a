//! Period classification of recordings.

use crate::sheet::DeploymentWindow;
use crate::timestamp::RecordingInterval;
use serde::Serialize;

/// Decision recorded for a file or a device directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Recorded entirely inside the deployment window.
    WithinPeriod,
    /// Started before the device was deployed.
    BeforeDeployment,
    /// Still recording after the device was picked up.
    AfterPickup,
    /// No duration or start time could be obtained; left in place.
    Unreadable,
    /// Device directory without matching files.
    DirectoryEmpty,
    /// Device listed in the sheet but its directory does not exist.
    DirectoryMissing,
    /// Device directory had leftovers that were quarantined.
    DirectoryPartial,
}

impl Outcome {
    /// All outcomes, in report order.
    pub const ALL: [Self; 7] = [
        Self::WithinPeriod,
        Self::BeforeDeployment,
        Self::AfterPickup,
        Self::Unreadable,
        Self::DirectoryEmpty,
        Self::DirectoryMissing,
        Self::DirectoryPartial,
    ];

    /// Label used in the report and in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WithinPeriod => "within_period",
            Self::BeforeDeployment => "before_deployment",
            Self::AfterPickup => "after_pickup",
            Self::Unreadable => "unreadable",
            Self::DirectoryEmpty => "directory_empty",
            Self::DirectoryMissing => "directory_missing",
            Self::DirectoryPartial => "directory_partial",
        }
    }

    /// Whether the outcome describes a device directory rather than a file.
    pub const fn is_directory_level(self) -> bool {
        matches!(
            self,
            Self::DirectoryEmpty | Self::DirectoryMissing | Self::DirectoryPartial
        )
    }

    /// Whether the file is moved to the out-of-period folder.
    pub const fn is_out_of_period(self) -> bool {
        matches!(self, Self::BeforeDeployment | Self::AfterPickup)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a recording against a deployment window.
///
/// The deployment check runs first, so a recording that violates both
/// bounds is `BeforeDeployment`. An absent bound never rejects.
pub fn classify(interval: &RecordingInterval, window: &DeploymentWindow) -> Outcome {
    if window
        .deployment_time
        .is_some_and(|deployed| interval.start < deployed)
    {
        return Outcome::BeforeDeployment;
    }

    if window
        .pickup_time
        .is_some_and(|picked_up| interval.end > picked_up)
    {
        return Outcome::AfterPickup;
    }

    Outcome::WithinPeriod
}
