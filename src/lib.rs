//! Arutrim - sorts autonomous recording unit (ARU) audio by deployment period.
//!
//! Every recording found in a device folder is compared with the device's
//! deployment window from the field sheet and moved to `in-period/` or
//! `out-of-period/`. Each decision ends up in a dated CSV report.

#![warn(missing_docs)]

pub mod audio;
pub mod audit;
pub mod classify;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod locking;
pub mod output;
pub mod pipeline;
pub mod router;
pub mod sheet;
pub mod timestamp;

use audio::SymphoniaProbe;
use audit::{AuditLog, report_path};
use clap::Parser;
use cli::{Cli, Command, ConfigAction, RunArgs};
use config::{
    Config, config_file_path, load_config, load_config_file, resolve_config_path, save_config,
    validate_config,
};
use locking::RunLock;
use pipeline::{RunOptions, run_trim};
use sheet::{DeploymentSheet, SheetColumns};
use std::path::Path;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for the arutrim CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.run.verbose, cli.run.silent);

    // Remove the run lock when interrupted
    if let Err(e) = ctrlc::set_handler(|| {
        locking::cleanup_all_locks();
        std::process::exit(130); // 128 + SIGINT(2)
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    trim(cli.config.as_deref(), &cli.run).map(|_| ())
}

/// Load the configuration, sort the data folder and write the report.
///
/// Everything that can be checked up front (config, sheet, device folders,
/// windows, the run lock) is checked before the first file is touched.
pub fn trim(config_path: Option<&Path>, args: &RunArgs) -> Result<AuditLog> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, args);
    validate_config(&config)?;

    if !config.data_folder.is_dir() {
        return Err(Error::ConfigValidation {
            message: format!(
                "data folder {} does not exist",
                config.data_folder.display()
            ),
        });
    }

    let sheet = DeploymentSheet::from_path(&config.sheet_path(), SheetColumns::from_config(&config))?;
    info!(
        "Loaded {} devices from {}",
        sheet.device_ids().len(),
        sheet.path().display()
    );

    let _lock = if args.dry_run {
        None
    } else {
        Some(RunLock::acquire(&config.data_folder, config_path)?)
    };

    let options = RunOptions {
        dry_run: args.dry_run,
        progress: !args.silent && !args.no_progress,
    };
    let mut log = run_trim(&config, &sheet, options, &SymphoniaProbe)?;
    log.sort();

    let report = report_path(&config.data_folder, chrono::Local::now().date_naive());
    log.write_csv(&report)?;

    for (outcome, count) in log.summary() {
        info!("{outcome}: {count}");
    }
    let failed = log.failures();
    if failed > 0 {
        warn!("{failed} relocations failed, see relocation_error in the report");
    }
    info!("Report written to {}", report.display());

    Ok(log)
}

/// Apply command-line overrides on top of the config file.
fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if args.copy {
        config.copy_files = true;
    }
    if let Some(jobs) = args.jobs {
        config.parallel_jobs = jobs;
    }
}

fn init_logging(verbose: u8, silent: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if silent {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init { path } => {
            let path = match path {
                Some(path) => path,
                None => config_file_path()?,
            };
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nNext steps:");
                println!("  set data_folder and deployment_sheet, then run: arutrim {}", path.display());
            }
            Ok(())
        }
        ConfigAction::Show { path } => {
            let config = match path {
                Some(path) => load_config_file(&path)?,
                None => load_config(None)?,
            };
            let contents =
                toml::to_string_pretty(&config).map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{contents}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = resolve_config_path(None, &std::env::current_dir()?)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args() -> RunArgs {
        RunArgs {
            dry_run: false,
            copy: false,
            jobs: None,
            silent: false,
            verbose: 0,
            no_progress: true,
        }
    }

    #[test]
    fn test_overrides_only_apply_when_given() {
        let mut config = Config {
            parallel_jobs: 3,
            ..Config::default()
        };
        apply_overrides(&mut config, &run_args());
        assert_eq!(config.parallel_jobs, 3);
        assert!(!config.copy_files);

        let args = RunArgs {
            copy: true,
            jobs: Some(8),
            ..run_args()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.parallel_jobs, 8);
        assert!(config.copy_files);
    }
}
