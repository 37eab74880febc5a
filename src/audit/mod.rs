//! Audit trail of every decision taken during a run.

mod log;
mod record;
mod report;

pub use log::AuditLog;
pub use record::{AuditRecord, Placement};
pub use report::report_path;
