//! Embedded recording-time metadata.
//!
//! AudioMoth firmware stores the recording start in the WAV comment, e.g.
//! `Recorded at 19:55:00 13/10/2021 (UTC-3) by AudioMoth 24F319055FDF2D42 ...`.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Comment timestamp layout written by AudioMoth.
const AUDIOMOTH_COMMENT_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

/// Largest UTC offset (hours) that a real time zone uses.
const MAX_OFFSET_HOURS: i32 = 14;

/// Parse an AudioMoth comment into a UTC recording start.
///
/// Returns `None` if the comment does not carry a recording time.
pub fn parse_audiomoth_comment(comment: &str) -> Option<DateTime<Utc>> {
    let (_, rest) = comment.split_once("Recorded at ")?;
    let (stamp, rest) = rest.split_once(" (")?;
    let (zone, _) = rest.split_once(')')?;

    let naive = NaiveDateTime::parse_from_str(stamp.trim(), AUDIOMOTH_COMMENT_FORMAT).ok()?;
    let offset = parse_utc_offset(zone.trim())?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse `UTC`, `UTC+2`, `UTC-3` or `UTC+5:30`.
fn parse_utc_offset(zone: &str) -> Option<FixedOffset> {
    let rest = zone.strip_prefix("UTC")?;
    if rest.is_empty() {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = if let Some(r) = rest.strip_prefix('+') {
        (1, r)
    } else if let Some(r) = rest.strip_prefix('-') {
        (-1, r)
    } else {
        return None;
    };

    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > MAX_OFFSET_HOURS || !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
