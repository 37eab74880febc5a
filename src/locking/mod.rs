//! Exclusive run lock on a data folder.

mod run_lock;

pub use run_lock::{LockInfo, RunLock, cleanup_all_locks};
