//! Audio container probing using symphonia.
//!
//! Only container headers, tags and packet boundaries are read; no samples
//! are decoded.

use crate::audio::metadata::parse_audiomoth_comment;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::path::Path;
use symphonia::core::codecs::{CODEC_TYPE_NULL, CodecParameters};
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::{Hint, ProbeResult};

/// Source of recording durations and embedded start times.
pub trait AudioProbe: Send + Sync {
    /// Measured duration in seconds.
    fn duration(&self, path: &Path) -> Result<f64>;

    /// Recording start stored in the file, if any.
    fn recording_start(&self, path: &Path) -> Result<Option<DateTime<Utc>>>;
}

/// [`AudioProbe`] backed by symphonia's format readers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaProbe;

impl AudioProbe for SymphoniaProbe {
    fn duration(&self, path: &Path) -> Result<f64> {
        let unreadable = |reason: String| Error::FileUnreadable {
            path: path.to_path_buf(),
            reason,
        };
        let probed = open(path).map_err(unreadable)?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| unreadable("no audio tracks".to_string()))?;
        let track_id = track.id;
        let params = track.codec_params.clone();

        let frames = match params.n_frames {
            Some(n) => n,
            None => count_frames(format.as_mut(), track_id).map_err(unreadable)?,
        };

        frames_to_secs(&params, frames).ok_or_else(|| unreadable("missing time base".to_string()))
    }

    fn recording_start(&self, path: &Path) -> Result<Option<DateTime<Utc>>> {
        let mut probed = open(path).map_err(|reason| Error::MetadataRead {
            path: path.to_path_buf(),
            reason,
        })?;

        // Tags found while probing (e.g. ID3) come first, then the container's own.
        if let Some(start) = probed
            .metadata
            .get()
            .as_ref()
            .and_then(|m| m.current())
            .and_then(start_from_tags)
        {
            return Ok(Some(start));
        }

        Ok(probed.format.metadata().current().and_then(start_from_tags))
    }
}

fn open(path: &Path) -> std::result::Result<ProbeResult, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    // Create hint from file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| e.to_string())
}

/// Sum packet durations for containers that do not declare a frame count.
fn count_frames(
    format: &mut dyn FormatReader,
    track_id: u32,
) -> std::result::Result<u64, String> {
    let mut frames = 0u64;
    loop {
        match format.next_packet() {
            Ok(packet) => {
                if packet.track_id() == track_id {
                    frames += packet.dur;
                }
            }
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.to_string()),
        }
    }
    Ok(frames)
}

#[allow(clippy::cast_precision_loss)]
fn frames_to_secs(params: &CodecParameters, frames: u64) -> Option<f64> {
    if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(frames);
        return Some(time.seconds as f64 + time.frac);
    }
    params
        .sample_rate
        .filter(|&rate| rate > 0)
        .map(|rate| frames as f64 / f64::from(rate))
}

fn start_from_tags(revision: &MetadataRevision) -> Option<DateTime<Utc>> {
    revision
        .tags()
        .iter()
        .filter(|tag| {
            tag.std_key == Some(StandardTagKey::Comment)
                || tag.key.eq_ignore_ascii_case("ICMT")
                || tag.key.eq_ignore_ascii_case("comment")
        })
        .find_map(|tag| parse_audiomoth_comment(&tag.value.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_unreadable() {
        let probe = SymphoniaProbe;
        let result = probe.duration(Path::new("/nonexistent/20211013_095500.WAV"));
        assert!(matches!(result, Err(Error::FileUnreadable { .. })));
    }

    #[test]
    fn test_garbage_file_has_no_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("20211013_095500.WAV");
        std::fs::write(&path, b"definitely not a RIFF container").unwrap();

        let probe = SymphoniaProbe;
        assert!(probe.duration(&path).is_err());
        assert!(matches!(
            probe.recording_start(&path),
            Err(Error::MetadataRead { .. })
        ));
    }
}
