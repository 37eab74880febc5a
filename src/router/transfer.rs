//! Moving or copying classified files to their destination folders.

use crate::classify::Outcome;
use crate::constants::folders;
use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// How files reach their destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferMode {
    /// Rename into place; the source disappears.
    #[default]
    Move,
    /// Copy into place; the source is left untouched.
    Copy,
}

/// What a relocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relocation {
    /// File moved to the destination.
    Moved(PathBuf),
    /// File copied to the destination.
    Copied(PathBuf),
    /// An identical file was already at the destination.
    AlreadyPresent(PathBuf),
    /// Dry run: where the file would go.
    Planned(PathBuf),
}

impl Relocation {
    /// Destination path of the file.
    pub fn destination(&self) -> &Path {
        match self {
            Self::Moved(p) | Self::Copied(p) | Self::AlreadyPresent(p) | Self::Planned(p) => p,
        }
    }
}

/// Output folders under the data folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    /// Recordings inside the deployment window.
    pub in_period: PathBuf,
    /// Recordings outside the deployment window.
    pub out_of_period: PathBuf,
    /// Leftovers of partially processed device folders.
    pub not_processed: PathBuf,
}

impl Destinations {
    /// Standard folder layout below `root`.
    pub fn under(root: &Path) -> Self {
        Self {
            in_period: root.join(folders::IN_PERIOD),
            out_of_period: root.join(folders::OUT_OF_PERIOD),
            not_processed: root.join(folders::NOT_PROCESSED),
        }
    }

    /// Per-device destination for an outcome, if files with that outcome move.
    pub fn device_dir(&self, outcome: Outcome, device: &str) -> Option<PathBuf> {
        match outcome {
            Outcome::WithinPeriod => Some(self.in_period.join(device)),
            Outcome::BeforeDeployment | Outcome::AfterPickup => {
                Some(self.out_of_period.join(device))
            }
            _ => None,
        }
    }

    /// Whether `name` is one of the output folder names.
    pub fn is_output_folder(name: &str) -> bool {
        [folders::IN_PERIOD, folders::OUT_OF_PERIOD, folders::NOT_PROCESSED].contains(&name)
    }
}

/// Places files according to their classification.
#[derive(Debug, Clone)]
pub struct Router {
    pub(super) destinations: Destinations,
    pub(super) mode: TransferMode,
    pub(super) dry_run: bool,
}

impl Router {
    /// Create a router writing below `data_folder`.
    pub fn new(data_folder: &Path, mode: TransferMode, dry_run: bool) -> Self {
        Self {
            destinations: Destinations::under(data_folder),
            mode,
            dry_run,
        }
    }

    /// Output folders used by this router.
    pub const fn destinations(&self) -> &Destinations {
        &self.destinations
    }

    /// Transfer mode.
    pub const fn mode(&self) -> TransferMode {
        self.mode
    }

    /// Whether the router only plans relocations.
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Route a classified file. Returns `None` for outcomes that stay in place.
    pub fn route(&self, file: &Path, device: &str, outcome: Outcome) -> Result<Option<Relocation>> {
        match self.destinations.device_dir(outcome, device) {
            Some(dest_dir) => self.relocate(file, &dest_dir).map(Some),
            None => Ok(None),
        }
    }

    /// Relocate `file` into `dest_dir`, keeping its file name.
    ///
    /// The directory is created on first use. An existing identical file at
    /// the destination counts as already relocated; a different one is a
    /// [`Error::DestinationConflict`].
    pub fn relocate(&self, file: &Path, dest_dir: &Path) -> Result<Relocation> {
        let file_name = file.file_name().ok_or_else(|| Error::Relocate {
            from: file.to_path_buf(),
            to: dest_dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        })?;
        let destination = dest_dir.join(file_name);

        if self.dry_run {
            return Ok(Relocation::Planned(destination));
        }

        if destination.exists() {
            return self.settle_existing(file, destination);
        }

        ensure_dir(dest_dir)?;

        match self.mode {
            TransferMode::Move => {
                move_file(file, &destination)?;
                Ok(Relocation::Moved(destination))
            }
            TransferMode::Copy => {
                fs::copy(file, &destination).map_err(|e| Error::Relocate {
                    from: file.to_path_buf(),
                    to: destination.clone(),
                    source: e,
                })?;
                Ok(Relocation::Copied(destination))
            }
        }
    }

    fn settle_existing(&self, file: &Path, destination: PathBuf) -> Result<Relocation> {
        if !files_equivalent(file, &destination)? {
            return Err(Error::DestinationConflict {
                source_path: file.to_path_buf(),
                destination,
            });
        }

        debug!(
            "{} already present at {}",
            file.display(),
            destination.display()
        );
        if self.mode == TransferMode::Move {
            fs::remove_file(file)?;
        }
        Ok(Relocation::AlreadyPresent(destination))
    }
}

/// Create a directory and its parents, tolerating concurrent creation.
pub(super) fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(Error::DirCreateFailed {
            path: dir.to_path_buf(),
            source: e,
        }),
    }
}

/// Rename `from` to `to`, copying across filesystems when needed.
pub(super) fn move_file(from: &Path, to: &Path) -> Result<()> {
    let relocate_err = |e: io::Error| Error::Relocate {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to).map_err(relocate_err)?;
            fs::remove_file(from).map_err(relocate_err)
        }
        Err(e) => Err(relocate_err(e)),
    }
}

/// Whether two files have the same length and content.
pub fn files_equivalent(a: &Path, b: &Path) -> Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(digest(a)? == digest(b)?)
}

fn digest(path: &Path) -> Result<Vec<u8>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hasher.finalize().to_vec())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_move_creates_device_folder() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("CARD01").join("20211013_095500.WAV");
        write(&src, b"audio");

        let router = Router::new(root.path(), TransferMode::Move, false);
        let relocation = router
            .route(&src, "CARD01", Outcome::WithinPeriod)
            .unwrap()
            .unwrap();

        let expected = root.path().join("in-period/CARD01/20211013_095500.WAV");
        assert_eq!(relocation, Relocation::Moved(expected.clone()));
        assert!(expected.exists());
        assert!(!src.exists());
    }

    #[test]
    fn test_copy_leaves_source() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("CARD01").join("20210930_235000.WAV");
        write(&src, b"audio");

        let router = Router::new(root.path(), TransferMode::Copy, false);
        let relocation = router
            .route(&src, "CARD01", Outcome::BeforeDeployment)
            .unwrap()
            .unwrap();

        assert!(matches!(relocation, Relocation::Copied(_)));
        assert!(src.exists());
        assert!(root.path().join("out-of-period/CARD01/20210930_235000.WAV").exists());
    }

    #[test]
    fn test_unreadable_stays_in_place() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("CARD01").join("broken.WAV");
        write(&src, b"??");

        let router = Router::new(root.path(), TransferMode::Move, false);
        assert!(router.route(&src, "CARD01", Outcome::Unreadable).unwrap().is_none());
        assert!(src.exists());
    }

    #[test]
    fn test_identical_destination_is_already_done() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("CARD01").join("a.WAV");
        let dest = root.path().join("in-period/CARD01/a.WAV");
        write(&src, b"same bytes");
        write(&dest, b"same bytes");

        let router = Router::new(root.path(), TransferMode::Move, false);
        let relocation = router.relocate(&src, dest.parent().unwrap()).unwrap();
        assert_eq!(relocation, Relocation::AlreadyPresent(dest.clone()));
        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"same bytes");
    }

    #[test]
    fn test_identical_destination_copy_mode_is_noop() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("CARD01").join("a.WAV");
        let dest = root.path().join("in-period/CARD01/a.WAV");
        write(&src, b"same bytes");
        write(&dest, b"same bytes");

        let router = Router::new(root.path(), TransferMode::Copy, false);
        let relocation = router.relocate(&src, dest.parent().unwrap()).unwrap();
        assert!(matches!(relocation, Relocation::AlreadyPresent(_)));
        assert!(src.exists());
    }

    #[test]
    fn test_different_destination_conflicts() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("CARD01").join("a.WAV");
        let dest = root.path().join("in-period/CARD01/a.WAV");
        write(&src, b"new take");
        write(&dest, b"old take");

        let router = Router::new(root.path(), TransferMode::Move, false);
        let result = router.relocate(&src, dest.parent().unwrap());
        assert!(matches!(result, Err(Error::DestinationConflict { .. })));
        assert!(src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"old take");
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("CARD01").join("a.WAV");
        write(&src, b"audio");

        let router = Router::new(root.path(), TransferMode::Move, true);
        let relocation = router
            .route(&src, "CARD01", Outcome::AfterPickup)
            .unwrap()
            .unwrap();
        assert!(matches!(relocation, Relocation::Planned(_)));
        assert!(src.exists());
        assert!(!root.path().join("out-of-period").exists());
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("in-period").join("CARD01");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_files_equivalent_same_length_different_bytes() {
        let root = TempDir::new().unwrap();
        let a = root.path().join("a");
        let b = root.path().join("b");
        write(&a, b"abcd");
        write(&b, b"abce");
        assert!(!files_equivalent(&a, &b).unwrap());
        write(&b, b"abcd");
        assert!(files_equivalent(&a, &b).unwrap());
    }
}
