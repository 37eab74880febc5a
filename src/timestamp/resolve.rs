//! Ordered resolution of a file's recording interval.

use crate::audio::AudioProbe;
use crate::error::{Error, Result};
use crate::timestamp::AruType;
use chrono::{DateTime, TimeDelta, Utc};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Where a recording start came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// Embedded container metadata.
    Metadata,
    /// The recorder's filename convention.
    Filename,
}

/// Time span covered by one recording, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingInterval {
    /// Recording start (UTC).
    pub start: DateTime<Utc>,
    /// Start plus measured duration.
    pub end: DateTime<Utc>,
    /// How the start was obtained.
    pub source: TimestampSource,
}

impl RecordingInterval {
    /// Build an interval from a start and a duration in seconds.
    ///
    /// Returns `None` for negative or non-finite durations.
    pub fn new(start: DateTime<Utc>, duration_secs: f64, source: TimestampSource) -> Option<Self> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return None;
        }
        let delta = TimeDelta::from_std(Duration::try_from_secs_f64(duration_secs).ok()?).ok()?;
        let end = start.checked_add_signed(delta)?;
        Some(Self { start, end, source })
    }
}

type Attempt = fn(&Path, AruType, &dyn AudioProbe) -> Option<DateTime<Utc>>;

/// Start-time sources in priority order.
const ATTEMPTS: [(TimestampSource, Attempt); 2] = [
    (TimestampSource::Metadata, from_metadata),
    (TimestampSource::Filename, from_filename),
];

fn from_metadata(path: &Path, _aru: AruType, probe: &dyn AudioProbe) -> Option<DateTime<Utc>> {
    match probe.recording_start(path) {
        Ok(Some(start)) => Some(start),
        Ok(None) => {
            debug!("{} has no recording metadata", path.display());
            None
        }
        Err(e) => {
            debug!("{e}");
            None
        }
    }
}

fn from_filename(path: &Path, aru: AruType, _probe: &dyn AudioProbe) -> Option<DateTime<Utc>> {
    aru.parse_filename(path)
}

/// Resolve a file's recording start, trying each source in turn.
pub fn resolve_start(
    path: &Path,
    aru: AruType,
    probe: &dyn AudioProbe,
) -> Option<(DateTime<Utc>, TimestampSource)> {
    ATTEMPTS
        .iter()
        .find_map(|(source, attempt)| attempt(path, aru, probe).map(|start| (start, *source)))
}

/// Measure a file and resolve its recording interval.
///
/// Any failure is reported as [`Error::FileUnreadable`].
pub fn read_interval(
    path: &Path,
    aru: AruType,
    probe: &dyn AudioProbe,
) -> Result<RecordingInterval> {
    let unreadable = |reason: String| Error::FileUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let duration_secs = probe.duration(path).map_err(|e| match e {
        Error::FileUnreadable { .. } => e,
        other => unreadable(other.to_string()),
    })?;

    let (start, source) = resolve_start(path, aru, probe)
        .ok_or_else(|| unreadable("no recording time in metadata or filename".to_string()))?;
    if source == TimestampSource::Filename {
        debug!(
            "{} has no metadata, recording time taken from filename",
            path.display()
        );
    }

    RecordingInterval::new(start, duration_secs, source)
        .ok_or_else(|| unreadable(format!("invalid duration {duration_secs}s")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FakeProbe {
        duration: Option<f64>,
        start: std::result::Result<Option<DateTime<Utc>>, ()>,
    }

    impl AudioProbe for FakeProbe {
        fn duration(&self, path: &Path) -> Result<f64> {
            self.duration.ok_or_else(|| Error::FileUnreadable {
                path: path.to_path_buf(),
                reason: "corrupt".to_string(),
            })
        }

        fn recording_start(&self, path: &Path) -> Result<Option<DateTime<Utc>>> {
            self.start.map_err(|()| Error::MetadataRead {
                path: path.to_path_buf(),
                reason: "corrupt header".to_string(),
            })
        }
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_metadata_wins_over_filename() {
        let probe = FakeProbe {
            duration: Some(60.0),
            start: Ok(Some(utc(2021, 10, 13, 10, 0, 0))),
        };
        let (start, source) =
            resolve_start(Path::new("20211013_095500.WAV"), AruType::AudioMoth, &probe).unwrap();
        assert_eq!(start, utc(2021, 10, 13, 10, 0, 0));
        assert_eq!(source, TimestampSource::Metadata);
    }

    #[test]
    fn test_missing_metadata_falls_back_to_filename() {
        let probe = FakeProbe {
            duration: Some(60.0),
            start: Ok(None),
        };
        let interval =
            read_interval(Path::new("20211013_095500.WAV"), AruType::AudioMoth, &probe).unwrap();
        assert_eq!(interval.start, utc(2021, 10, 13, 9, 55, 0));
        assert_eq!(interval.end, utc(2021, 10, 13, 9, 56, 0));
        assert_eq!(interval.source, TimestampSource::Filename);
    }

    #[test]
    fn test_metadata_error_falls_back_to_filename() {
        let probe = FakeProbe {
            duration: Some(30.0),
            start: Err(()),
        };
        let interval = read_interval(
            Path::new("S4A01_20211013_095500.wav"),
            AruType::Smm,
            &probe,
        )
        .unwrap();
        assert_eq!(interval.start, utc(2021, 10, 13, 9, 55, 0));
        assert_eq!(interval.end, utc(2021, 10, 13, 9, 55, 30));
    }

    #[test]
    fn test_no_source_is_unreadable() {
        let probe = FakeProbe {
            duration: Some(60.0),
            start: Ok(None),
        };
        let result = read_interval(Path::new("notes.WAV"), AruType::AudioMoth, &probe);
        assert!(matches!(result, Err(Error::FileUnreadable { .. })));
    }

    #[test]
    fn test_unmeasurable_duration_is_unreadable() {
        let probe = FakeProbe {
            duration: None,
            start: Ok(Some(utc(2021, 10, 13, 10, 0, 0))),
        };
        let result = read_interval(Path::new("20211013_095500.WAV"), AruType::AudioMoth, &probe);
        assert!(matches!(result, Err(Error::FileUnreadable { .. })));
    }

    #[test]
    fn test_interval_rejects_negative_duration() {
        let start = utc(2021, 10, 13, 9, 55, 0);
        assert!(RecordingInterval::new(start, -1.0, TimestampSource::Filename).is_none());
        assert!(RecordingInterval::new(start, f64::NAN, TimestampSource::Filename).is_none());
    }

    #[test]
    fn test_interval_keeps_subsecond_duration() {
        let start = utc(2021, 10, 13, 9, 55, 0);
        let interval = RecordingInterval::new(start, 1.5, TimestampSource::Filename).unwrap();
        assert_eq!((interval.end - interval.start).num_milliseconds(), 1500);
    }
}
