//! Audio container probing: durations and embedded recording times.

mod metadata;
mod probe;

pub use metadata::parse_audiomoth_comment;
pub use probe::{AudioProbe, SymphoniaProbe};
