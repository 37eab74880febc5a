//! Lock file guarding a data folder against concurrent runs.

use crate::constants::LOCK_FILE_NAME;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Lock file content, for whoever finds a lock left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Process ID that holds the lock.
    pub pid: u32,
    /// Hostname of the machine.
    pub hostname: String,
    /// When the lock was acquired.
    pub started: DateTime<Utc>,
    /// Config file the run was started with.
    pub config: Option<PathBuf>,
}

impl LockInfo {
    fn current(config: Option<&Path>) -> Self {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            pid: std::process::id(),
            hostname,
            started: Utc::now(),
            config: config.map(Path::to_path_buf),
        }
    }
}

impl fmt::Display for LockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pid {} on {} since {}",
            self.pid,
            self.hostname,
            self.started.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// Holds `<data_folder>/.arutrim.lock` until dropped.
#[derive(Debug)]
pub struct RunLock {
    lock_path: PathBuf,
}

impl RunLock {
    /// Take the lock of `data_folder`.
    ///
    /// Fails with [`Error::DataFolderLocked`] if another run holds it.
    pub fn acquire(data_folder: &Path, config: Option<&Path>) -> Result<Self> {
        let lock_path = Self::lock_path_for(data_folder);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&lock_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let holder = Self::holder(data_folder)
                    .map_or_else(|| "an unknown run".to_string(), |info| info.to_string());
                return Err(Error::DataFolderLocked {
                    path: lock_path,
                    holder,
                });
            }
            Err(e) => {
                return Err(Error::LockCreate {
                    path: lock_path,
                    source: e,
                });
            }
        };

        // The lock is the file itself; its content is informational.
        if let Err(e) = write_info(&mut file, &LockInfo::current(config)) {
            warn!(
                "Could not write lock details to {}: {e}",
                lock_path.display()
            );
        }
        ACTIVE_LOCKS.register(&lock_path);

        Ok(Self { lock_path })
    }

    /// Lock file path of a data folder.
    pub fn lock_path_for(data_folder: &Path) -> PathBuf {
        data_folder.join(LOCK_FILE_NAME)
    }

    /// Whether a run currently holds the lock of `data_folder`.
    pub fn is_locked(data_folder: &Path) -> bool {
        Self::lock_path_for(data_folder).exists()
    }

    /// Who holds the lock of `data_folder`, if the lock file is readable.
    pub fn holder(data_folder: &Path) -> Option<LockInfo> {
        let contents = fs::read_to_string(Self::lock_path_for(data_folder)).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        ACTIVE_LOCKS.unregister(&self.lock_path);
    }
}

fn write_info(writer: &mut impl Write, info: &LockInfo) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, info)?;
    writer.flush()
}

/// Lock files this process holds, so the Ctrl+C handler can remove them.
struct LockRegistry(Mutex<Vec<PathBuf>>);

impl LockRegistry {
    const fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }

    fn register(&self, path: &Path) {
        if let Ok(mut locks) = self.0.lock() {
            locks.push(path.to_path_buf());
        }
    }

    fn unregister(&self, path: &Path) {
        if let Ok(mut locks) = self.0.lock() {
            locks.retain(|p| p != path);
        }
    }

    fn remove_all(&self) {
        if let Ok(locks) = self.0.lock() {
            for path in locks.iter() {
                let _ = fs::remove_file(path);
            }
        }
    }
}

static ACTIVE_LOCKS: LockRegistry = LockRegistry::new();

/// Remove every lock held by this process. Called on signal.
pub fn cleanup_all_locks() {
    ACTIVE_LOCKS.remove_all();
}
