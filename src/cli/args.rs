//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sort ARU recordings into in-period and out-of-period folders.
#[derive(Debug, Parser)]
#[command(name = "arutrim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file (default: platform config path).
    #[arg(env = "ARUTRIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Options of a trimming run.
    #[command(flatten)]
    pub run: RunArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Create a default configuration file.
    Init {
        /// Where to write it (default: platform config path).
        path: Option<PathBuf>,
    },
    /// Display the effective configuration.
    Show {
        /// Config file to read (default: platform config path).
        path: Option<PathBuf>,
    },
    /// Print the platform configuration file path.
    Path,
}

/// Arguments of a trimming run.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Classify and write the report without moving any file.
    #[arg(long, env = "ARUTRIM_DRY_RUN")]
    pub dry_run: bool,

    /// Copy files instead of moving them (overrides config).
    #[arg(long, env = "ARUTRIM_COPY")]
    pub copy: bool,

    /// Worker threads per device (overrides config).
    #[arg(short, long, value_parser = parse_jobs, env = "ARUTRIM_JOBS")]
    pub jobs: Option<usize>,

    /// Only log warnings and errors.
    #[arg(short = 'q', long, visible_alias = "quiet")]
    pub silent: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "silent")]
    pub verbose: u8,

    /// Disable progress bars.
    #[arg(long)]
    pub no_progress: bool,
}

/// Parse and validate the worker count.
fn parse_jobs(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("jobs must be at least 1".to_string());
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jobs() {
        assert_eq!(parse_jobs("4").ok(), Some(4));
        assert!(parse_jobs("0").is_err());
        assert!(parse_jobs("many").is_err());
    }

    #[test]
    fn test_cli_parse_config_path() {
        let cli = Cli::try_parse_from(["arutrim", "field/trim.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("field/trim.toml")));
        assert!(cli.command.is_none());
        assert!(!cli.run.dry_run);
    }

    #[test]
    fn test_cli_parse_run_options() {
        let cli = Cli::try_parse_from([
            "arutrim",
            "trim.toml",
            "--dry-run",
            "--copy",
            "-j",
            "4",
            "-vv",
        ])
        .unwrap();
        assert!(cli.run.dry_run);
        assert!(cli.run.copy);
        assert_eq!(cli.run.jobs, Some(4));
        assert_eq!(cli.run.verbose, 2);
    }

    #[test]
    fn test_cli_silent_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["arutrim", "trim.toml", "--silent", "-v"]).is_err());
        let cli = Cli::try_parse_from(["arutrim", "trim.toml", "--quiet"]).unwrap();
        assert!(cli.run.silent);
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["arutrim", "config", "init", "trim.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Init { path: Some(_) }
            })
        ));

        let cli = Cli::try_parse_from(["arutrim", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Path
            })
        ));
    }
}
