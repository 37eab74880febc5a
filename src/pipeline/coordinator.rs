//! Pipeline coordination: device discovery, planning and the run loop.

use crate::audio::AudioProbe;
use crate::audit::{AuditLog, AuditRecord};
use crate::classify::Outcome;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::progress;
use crate::pipeline::processor::{FileContext, process_device};
use crate::router::{Destinations, Router, TransferMode};
use crate::sheet::{DeploymentSheet, DeploymentWindow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Run-level switches that do not live in the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Classify and report without touching any file.
    pub dry_run: bool,
    /// Show per-device progress bars.
    pub progress: bool,
}

/// A device whose window has been resolved, ready to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePlan {
    /// Device/card id.
    pub device: String,
    /// Device folder in the data folder.
    pub dir: PathBuf,
    /// Window the device's files are classified against.
    pub window: DeploymentWindow,
}

/// Subdirectories of the data folder that look like devices but have no
/// sheet row.
///
/// Output folders, hidden folders and `ignore_directories` are not devices.
pub fn unlisted_directories(config: &Config, sheet: &DeploymentSheet) -> Result<Vec<String>> {
    let mut unlisted = Vec::new();

    for entry in fs::read_dir(&config.data_folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.')
            || Destinations::is_output_folder(&name)
            || config.ignore_directories.contains(&name)
        {
            continue;
        }
        if !sheet.contains(&name) {
            unlisted.push(name);
        }
    }

    unlisted.sort();
    Ok(unlisted)
}

/// Resolve every device's window before any file is touched.
///
/// Fails on the first device folder without a sheet row and on the first
/// sheet row that cannot be resolved.
pub fn plan_devices(config: &Config, sheet: &DeploymentSheet) -> Result<Vec<DevicePlan>> {
    if let Some(device) = unlisted_directories(config, sheet)?.into_iter().next() {
        return Err(Error::MissingDeviceRecord { device });
    }

    sheet
        .device_ids()
        .into_iter()
        .map(|device| -> Result<DevicePlan> {
            let window =
                sheet.resolve(&device, &config.datetime_format_str, config.delay_hours)?;
            Ok(DevicePlan {
                dir: config.data_folder.join(&device),
                device,
                window,
            })
        })
        .collect()
}

/// Files directly inside `dir` whose name matches one of `patterns`, sorted.
///
/// A missing folder yields no files.
pub fn collect_device_files(dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if patterns
            .iter()
            .any(|pattern| glob_match::glob_match(pattern, &name))
        {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Process every device of the sheet and return the audit log.
///
/// Configuration problems surface before the first file is touched. After
/// that, failures of single files are recorded and the run continues.
pub fn run_trim(
    config: &Config,
    sheet: &DeploymentSheet,
    options: RunOptions,
    probe: &dyn AudioProbe,
) -> Result<AuditLog> {
    let plans = plan_devices(config, sheet)?;
    let patterns = config.file_patterns();

    let mode = if config.copy_files {
        TransferMode::Copy
    } else {
        TransferMode::Move
    };
    let router = Router::new(&config.data_folder, mode, options.dry_run);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallel_jobs.max(1))
        .build()
        .map_err(|e| Error::WorkerPool {
            reason: e.to_string(),
        })?;

    if options.dry_run {
        info!("Dry run: no files will be moved");
    }

    let mut log = AuditLog::new();
    for plan in &plans {
        if !plan.dir.is_dir() {
            info!("{} not found in {}, skipping", plan.device, config.data_folder.display());
            log.push(AuditRecord::for_directory(
                &plan.device,
                Outcome::DirectoryMissing,
                None,
            ));
            continue;
        }

        let files = collect_device_files(&config.aru_type.recordings_dir(&plan.dir), &patterns)?;
        if files.is_empty() {
            warn!("Found zero matching files in {}, skipping", plan.device);
            log.push(AuditRecord::for_directory(
                &plan.device,
                Outcome::DirectoryEmpty,
                None,
            ));
            continue;
        }

        info!("Processing {} ({} files)", plan.device, files.len());
        let bar = progress::create_device_progress(files.len(), &plan.device, options.progress);
        let ctx = FileContext {
            device: &plan.device,
            window: plan.window,
            aru: config.aru_type,
            probe,
            router: &router,
            progress: bar.as_ref(),
        };
        log.extend(process_device(&ctx, &plan.dir, &files, &pool));
        progress::finish_progress(bar, &plan.device);
    }

    Ok(log)
}
