//! Command-line argument definitions for the sitelog processor
//!
//! Uses the clap derive API. Every subcommand carries the same logging
//! switches and maps its flags onto a [`Config`].

use crate::config::Config;
use crate::constants::sinex;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Station metadata tool for GNSS site logs and SINEX files
///
/// Decodes equipment histories, cleans them into strictly ordered timelines
/// and reconciles receivers and antennas into station-info intervals.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sitelog-processor",
    version,
    about = "Derive station-info intervals from IGS site logs and SINEX files"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print the reconciled receiver/antenna intervals of a file
    Intervals(IntervalsArgs),
    /// Decode and clean files, reporting warnings and failures
    Check(CheckArgs),
}

/// Input file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Decide from the extension, then from the first line
    Auto,
    Sitelog,
    Sinex,
}

impl InputFormat {
    /// Resolve `Auto` for a concrete file
    pub fn resolve(self, path: &Path) -> Result<InputFormat> {
        if self != InputFormat::Auto {
            return Ok(self);
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("snx" | "sinex" | "ssc") => return Ok(InputFormat::Sinex),
            Some("log") => return Ok(InputFormat::Sitelog),
            _ => {}
        }

        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
        let mut first_line = String::new();
        BufReader::new(file)
            .read_line(&mut first_line)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;

        let sinex_marker = format!("{}{}", sinex::HEADER_PREFIX, sinex::DOCUMENT_TYPE);
        if first_line.starts_with(&sinex_marker) {
            Ok(InputFormat::Sinex)
        } else {
            Ok(InputFormat::Sitelog)
        }
    }

    /// Whether a file found while walking a directory should be decoded
    pub fn accepts(self, path: &Path) -> bool {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match (self, extension.as_deref()) {
            (InputFormat::Sitelog, Some(ext)) => ext == "log",
            (InputFormat::Sinex, Some(ext)) => matches!(ext, "snx" | "sinex" | "ssc"),
            (InputFormat::Auto, Some(ext)) => matches!(ext, "log" | "snx" | "sinex" | "ssc"),
            (_, None) => false,
        }
    }
}

/// Logging switches shared by all subcommands
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct LogArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl LogArgs {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Arguments for the intervals command
#[derive(Debug, Clone, Parser)]
pub struct IntervalsArgs {
    /// Site log or SINEX file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[arg(long = "format", value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// Four character code of the site to report (SINEX files hold many)
    #[arg(long = "site", value_name = "CODE")]
    pub site: Option<String>,

    /// Cut overlapping device dates back instead of failing
    #[arg(long = "force")]
    pub force: bool,

    /// Merge receiver entries that differ only in firmware
    #[arg(long = "ignore-firmware")]
    pub ignore_firmware: bool,

    #[command(flatten)]
    pub logging: LogArgs,
}

impl IntervalsArgs {
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::default();
        config.history.force = self.force;
        config.reconcile.ignore_receiver_firmware = self.ignore_firmware;
        config.validate()?;
        Ok(config)
    }
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Files or directories to check; directories are walked recursively
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    #[arg(long = "format", value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// Cut overlapping device dates back instead of failing
    #[arg(long = "force")]
    pub force: bool,

    /// Report unknown site log keys as warnings
    #[arg(long = "strict")]
    pub strict: bool,

    #[command(flatten)]
    pub logging: LogArgs,
}

impl CheckArgs {
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::default();
        config.history.force = self.force;
        config.sitelog.strict_unknown_fields = self.strict;
        config.validate()?;
        Ok(config)
    }
}

impl Commands {
    pub fn logging(&self) -> &LogArgs {
        match self {
            Commands::Intervals(args) => &args.logging,
            Commands::Check(args) => &args.logging,
        }
    }
}
