//! Recording start resolution.
//!
//! A file's start comes from embedded metadata when available and from the
//! recorder's filename convention otherwise.

mod aru;
mod resolve;

pub use aru::{AruType, FileLayout};
pub use resolve::{RecordingInterval, TimestampSource, read_interval, resolve_start};
