//! Deployment sheet loading and per-device window resolution.

mod loader;
mod window;

pub use loader::{DeploymentSheet, SheetColumns};
pub use window::{DeploymentWindow, parse_sheet_time};
