//! Command implementations for the sitelog processor CLI
//!
//! Each subcommand lives in its own module:
//! - `intervals`: decode, clean and reconcile one file, printing a table
//! - `check`: decode and clean many files, reporting warnings and failures

pub mod check;
pub mod intervals;
pub mod shared;

pub use shared::CommandStats;

use crate::cli::args::{Args, Commands};
use anyhow::Result;

/// Dispatch to the subcommand handler after installing logging
pub fn run(args: Args) -> Result<CommandStats> {
    shared::setup_logging(args.command.logging());

    match args.command {
        Commands::Intervals(intervals_args) => intervals::run_intervals(intervals_args),
        Commands::Check(check_args) => check::run_check(check_args),
    }
}
