//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};
use chrono::format::{Item, StrftimeItems};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_paths(config)?;
    validate_sheet_columns(config)?;
    validate_formats(config)?;
    validate_run_settings(config)?;
    Ok(())
}

fn validate_paths(config: &Config) -> Result<()> {
    if config.data_folder.as_os_str().is_empty() {
        return Err(Error::ConfigValidation {
            message: "data_folder must not be empty".to_string(),
        });
    }

    if config.deployment_sheet.as_os_str().is_empty() {
        return Err(Error::ConfigValidation {
            message: "deployment_sheet must not be empty".to_string(),
        });
    }

    Ok(())
}

fn validate_sheet_columns(config: &Config) -> Result<()> {
    for (key, value) in [
        ("subdirectories_column", &config.subdirectories_column),
        ("deployment_time_column", &config.deployment_time_column),
        ("pickup_time_column", &config.pickup_time_column),
    ] {
        if value.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    let format = &config.datetime_format_str;
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::ConfigValidation {
            message: format!("datetime_format_str '{format}' is not a valid format string"),
        });
    }

    Ok(())
}

fn validate_formats(config: &Config) -> Result<()> {
    if config.audio_formats.is_empty() && config.gps_formats.is_empty() {
        return Err(Error::ConfigValidation {
            message: "at least one of audio_formats or gps_formats must be set".to_string(),
        });
    }

    if let Some(ext) = config
        .audio_formats
        .iter()
        .chain(&config.gps_formats)
        .find(|ext| ext.trim_start_matches('.').is_empty())
    {
        return Err(Error::ConfigValidation {
            message: format!("invalid file format '{ext}'"),
        });
    }

    Ok(())
}

fn validate_run_settings(config: &Config) -> Result<()> {
    if config.parallel_jobs == 0 {
        return Err(Error::ConfigValidation {
            message: "parallel_jobs must be at least 1".to_string(),
        });
    }

    if let Some(hours) = config.delay_hours
        && (!hours.is_finite() || hours < 0.0)
    {
        return Err(Error::ConfigValidation {
            message: format!("delay_hours must be a non-negative number, got {hours}"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_parallel_jobs() {
        let config = Config {
            parallel_jobs: 0,
            ..Config::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_validate_negative_delay() {
        let config = Config {
            delay_hours: Some(-1.0),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_nan_delay() {
        let config = Config {
            delay_hours: Some(f64::NAN),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_column() {
        let config = Config {
            pickup_time_column: "  ".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_datetime_format() {
        let config = Config {
            datetime_format_str: "%Q/%m".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_no_formats() {
        let config = Config {
            audio_formats: Vec::new(),
            gps_formats: Vec::new(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
