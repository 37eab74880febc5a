//! Processing pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{
    DevicePlan, RunOptions, collect_device_files, plan_devices, run_trim, unlisted_directories,
};
pub use processor::{FileContext, process_device, process_file};
