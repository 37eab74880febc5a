//! Configuration file locations.

use crate::constants::{APP_NAME, CONFIG_FILE_NAME, LOCAL_CONFIG_FILE};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Per-user configuration directory.
///
/// - Linux: `~/.config/arutrim/`
/// - macOS: `~/Library/Application Support/arutrim/`
/// - Windows: `%APPDATA%\arutrim\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Per-user config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Config file a run should use.
///
/// An explicit path wins. Otherwise an `arutrim.toml` in `working_dir` is
/// preferred over the per-user file, so a field campaign folder can carry
/// its own settings.
pub fn resolve_config_path(explicit: Option<&Path>, working_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let local = working_dir.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Ok(local);
    }

    config_file_path()
}
