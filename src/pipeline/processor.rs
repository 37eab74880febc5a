//! Per-file and per-device processing.

use crate::audio::AudioProbe;
use crate::audit::{AuditRecord, Placement};
use crate::classify::{Outcome, classify};
use crate::router::{DirectoryDisposition, Relocation, Router};
use crate::sheet::DeploymentWindow;
use crate::timestamp::{AruType, read_interval};
use indicatif::ProgressBar;
use rayon::ThreadPool;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Everything a worker needs to process the files of one device.
#[derive(Clone, Copy)]
pub struct FileContext<'a> {
    /// Device/card id.
    pub device: &'a str,
    /// Window of the device.
    pub window: DeploymentWindow,
    /// Recorder type, for the filename convention.
    pub aru: AruType,
    /// Duration and metadata reader.
    pub probe: &'a dyn AudioProbe,
    /// Destination of classified files.
    pub router: &'a Router,
    /// Progress bar advanced once per file.
    pub progress: Option<&'a ProgressBar>,
}

/// Classify and route one file. Never fails: problems end up in the record,
/// a failed relocation as [`Placement::Failed`] next to the outcome.
pub fn process_file(ctx: &FileContext<'_>, file: &Path) -> AuditRecord {
    let record = |outcome, interval| {
        AuditRecord::for_file(ctx.device, outcome, file.to_path_buf(), interval, ctx.window)
    };

    let interval = match read_interval(file, ctx.aru, ctx.probe) {
        Ok(interval) => interval,
        Err(e) => {
            warn!("{e}");
            return record(Outcome::Unreadable, None);
        }
    };

    let outcome = classify(&interval, &ctx.window);
    info!(
        "{}: {} ({} to {})",
        file.display(),
        outcome,
        interval.start.format("%Y-%m-%d %H:%M"),
        interval.end.format("%Y-%m-%d %H:%M")
    );

    let placement = match ctx.router.route(file, ctx.device, outcome) {
        Ok(Some(relocation)) => {
            if let Relocation::Planned(dest) = &relocation {
                debug!("Would move {} to {}", file.display(), dest.display());
            } else {
                debug!("{} -> {}", file.display(), relocation.destination().display());
            }
            Placement::Relocated(relocation)
        }
        Ok(None) => Placement::InPlace,
        Err(e) => {
            error!("{e}");
            Placement::Failed(e.to_string())
        }
    };

    record(outcome, Some(interval)).with_placement(placement)
}

/// Process every file of a device on `pool`, then clean up the device folder.
///
/// Returns one record per file, plus a `directory_partial` record when
/// leftovers had to be quarantined or the cleanup failed. A failed cleanup
/// is logged and recorded; it never ends the run.
pub fn process_device(
    ctx: &FileContext<'_>,
    device_dir: &Path,
    files: &[PathBuf],
    pool: &ThreadPool,
) -> Vec<AuditRecord> {
    let mut records: Vec<AuditRecord> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                let record = process_file(ctx, file);
                if let Some(pb) = ctx.progress {
                    pb.inc(1);
                }
                record
            })
            .collect()
    });

    let partial = |file: PathBuf| {
        AuditRecord::for_directory(ctx.device, Outcome::DirectoryPartial, Some(file))
    };

    match ctx.router.finalize_source_dir(device_dir, ctx.device) {
        Ok(DirectoryDisposition::Quarantined {
            destination,
            entries,
            left_behind,
        }) => {
            warn!(
                "Moved {entries} unprocessed entries of {} to {}",
                ctx.device,
                destination.display()
            );
            let mut record = partial(destination);
            if !left_behind.is_empty() {
                let message = format!(
                    "{} entries left in {}",
                    left_behind.len(),
                    device_dir.display()
                );
                warn!("{}: {message}", ctx.device);
                record = record.with_placement(Placement::Failed(message));
            }
            records.push(record);
        }
        Ok(DirectoryDisposition::Removed | DirectoryDisposition::Kept) => {}
        Err(e) => {
            error!("Could not clean up {}: {e}", device_dir.display());
            records.push(
                partial(device_dir.to_path_buf()).with_placement(Placement::Failed(e.to_string())),
            );
        }
    }

    records
}
