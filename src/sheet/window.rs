//! Deployment windows and sheet timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use std::time::Duration;

/// Cell values treated as empty, as spreadsheet exports write them.
const MISSING_CELL_VALUES: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Time range during which a device's recordings are valid.
///
/// An absent bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeploymentWindow {
    /// When the device was deployed.
    pub deployment_time: Option<DateTime<Utc>>,
    /// When the device was picked up.
    pub pickup_time: Option<DateTime<Utc>>,
}

impl DeploymentWindow {
    /// Narrow the window by `hours` on each side.
    ///
    /// Only bounds that are present are shifted.
    #[must_use]
    pub fn with_buffer(self, hours: Option<f64>) -> Self {
        let Some(delta) = hours.and_then(hours_to_delta) else {
            return self;
        };

        Self {
            deployment_time: self
                .deployment_time
                .map(|t| t.checked_add_signed(delta).unwrap_or(t)),
            pickup_time: self
                .pickup_time
                .map(|t| t.checked_sub_signed(delta).unwrap_or(t)),
        }
    }
}

fn hours_to_delta(hours: f64) -> Option<TimeDelta> {
    let secs = hours * 3600.0;
    TimeDelta::from_std(Duration::try_from_secs_f64(secs).ok()?).ok()
}

/// Whether a sheet cell holds no value.
pub fn is_missing_cell(value: &str) -> bool {
    MISSING_CELL_VALUES.contains(&value.trim())
}

/// Parse a sheet timestamp with a strptime-style format, as UTC.
///
/// Formats without a time component parse as midnight.
pub fn parse_sheet_time(value: &str, format: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, format)
        .or_else(|_| {
            NaiveDate::parse_from_str(value, format).map(|date| date.and_time(NaiveTime::MIN))
        })
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_default_sheet_format() {
        let t = parse_sheet_time("10/01/21 14:30", "%m/%d/%y %H:%M").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2021, 10, 1, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_date_only_format_is_midnight() {
        let t = parse_sheet_time("2021-10-15", "%Y-%m-%d").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2021, 10, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_mismatched_value() {
        assert!(parse_sheet_time("15 October", "%m/%d/%y %H:%M").is_none());
    }

    #[test]
    fn test_missing_cells() {
        assert!(is_missing_cell(""));
        assert!(is_missing_cell("  "));
        assert!(is_missing_cell("NaN"));
        assert!(!is_missing_cell("10/01/21 14:30"));
    }

    #[test]
    fn test_buffer_shifts_present_bounds_only() {
        let deployed = Utc.with_ymd_and_hms(2021, 10, 1, 0, 0, 0).unwrap();
        let window = DeploymentWindow {
            deployment_time: Some(deployed),
            pickup_time: None,
        }
        .with_buffer(Some(1.5));

        assert_eq!(
            window.deployment_time,
            Some(Utc.with_ymd_and_hms(2021, 10, 1, 1, 30, 0).unwrap())
        );
        assert!(window.pickup_time.is_none());
    }

    #[test]
    fn test_buffer_narrows_pickup() {
        let picked = Utc.with_ymd_and_hms(2021, 10, 15, 0, 0, 0).unwrap();
        let window = DeploymentWindow {
            deployment_time: None,
            pickup_time: Some(picked),
        }
        .with_buffer(Some(24.0));
        assert_eq!(
            window.pickup_time,
            Some(Utc.with_ymd_and_hms(2021, 10, 14, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_no_buffer_is_identity() {
        let window = DeploymentWindow {
            deployment_time: Some(Utc.with_ymd_and_hms(2021, 10, 1, 0, 0, 0).unwrap()),
            pickup_time: None,
        };
        assert_eq!(window.with_buffer(None), window);
    }
}
