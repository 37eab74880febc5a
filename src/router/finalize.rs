//! Cleanup of source device folders once their files are routed.

use super::transfer::{Router, TransferMode, ensure_dir, files_equivalent, move_file};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What happened to a source device folder after processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryDisposition {
    /// Left as is (copy mode or dry run).
    Kept,
    /// Empty after processing and removed.
    Removed,
    /// Leftovers moved to the not-processed area. The folder is removed
    /// unless some entries could not be moved.
    Quarantined {
        /// Folder now holding the leftovers.
        destination: PathBuf,
        /// Number of top-level entries moved.
        entries: usize,
        /// Entries still in the device folder.
        left_behind: Vec<PathBuf>,
    },
}

impl Router {
    /// Remove a processed device folder, quarantining anything left in it.
    ///
    /// Only acts in move mode outside dry runs. Empty subfolders (such as
    /// the emptied `Data/` folder of the nested layout) are pruned first.
    pub fn finalize_source_dir(&self, device_dir: &Path, device: &str) -> Result<DirectoryDisposition> {
        if self.dry_run || self.mode == TransferMode::Copy {
            return Ok(DirectoryDisposition::Kept);
        }

        prune_empty_subdirs(device_dir)?;

        let mut leftovers: Vec<PathBuf> = fs::read_dir(device_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        leftovers.sort();

        if leftovers.is_empty() {
            fs::remove_dir(device_dir)?;
            debug!("Removed empty folder {}", device_dir.display());
            return Ok(DirectoryDisposition::Removed);
        }

        warn!("Could not process all files in {device}");
        let destination = self.destinations.not_processed.join(device);
        ensure_dir(&destination)?;

        let mut entries = 0;
        let mut left_behind = Vec::new();
        for entry in leftovers {
            match quarantine_entry(&entry, &destination) {
                Ok(()) => entries += 1,
                Err(e) => {
                    warn!("{e}; leaving {} in place", entry.display());
                    left_behind.push(entry);
                }
            }
        }

        if left_behind.is_empty() {
            fs::remove_dir(device_dir)?;
        }

        Ok(DirectoryDisposition::Quarantined {
            destination,
            entries,
            left_behind,
        })
    }
}

/// Move one leftover into `destination`. An identical file already there
/// counts as moved; anything else already there is a conflict.
fn quarantine_entry(entry: &Path, destination: &Path) -> Result<()> {
    let target = match entry.file_name() {
        Some(name) => destination.join(name),
        None => destination.to_path_buf(),
    };

    if target.exists() {
        if entry.is_file() && target.is_file() && files_equivalent(entry, &target)? {
            fs::remove_file(entry)?;
            return Ok(());
        }
        return Err(Error::DestinationConflict {
            source_path: entry.to_path_buf(),
            destination: target,
        });
    }

    move_file(entry, &target)
}

/// Remove empty directories below `dir`, deepest first. `dir` itself stays.
fn prune_empty_subdirs(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() && !path.is_symlink() {
            prune_empty_subdirs(&path)?;
            if fs::read_dir(&path)?.next().is_none() {
                fs::remove_dir(&path)?;
            }
        }
    }
    Ok(())
}
