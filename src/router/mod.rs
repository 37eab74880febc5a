//! File relocation into the period folders.

mod finalize;
mod transfer;

pub use finalize::DirectoryDisposition;
pub use transfer::{Destinations, Relocation, Router, TransferMode, files_equivalent};
