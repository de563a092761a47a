//! Check command: decode and clean many files, summarizing the outcome

use super::shared::{CommandStats, collect_inputs, load_file};
use crate::app::services::site_history::clean_site_history;
use crate::cli::args::{CheckArgs, InputFormat};
use crate::config::Config;
use anyhow::{Context, Result, bail};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of checking one file
#[derive(Debug, Default)]
pub struct FileReport {
    pub sites: usize,
    pub warnings: Vec<String>,
}

pub fn run_check(args: CheckArgs) -> Result<CommandStats> {
    let start_time = Instant::now();
    let config = args.to_config()?;

    let files = collect_inputs(&args.paths, args.format)?;
    if files.is_empty() {
        bail!("No site log or SINEX files found");
    }
    info!("Checking {} files", files.len());

    let progress_bar = if files.len() > 1 && args.logging.show_progress() {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut stats = CommandStats::default();
    let mut reports: Vec<(PathBuf, FileReport)> = Vec::new();
    let mut failures: Vec<(PathBuf, String)> = Vec::new();

    for path in &files {
        if let Some(pb) = &progress_bar {
            let name = path.file_name().map(|n| n.to_string_lossy().to_string());
            pb.set_message(name.unwrap_or_default());
        }

        match check_file(path, args.format, &config) {
            Ok(report) => {
                stats.files_processed += 1;
                stats.sites_processed += report.sites;
                stats.warnings += report.warnings.len();
                reports.push((path.clone(), report));
            }
            Err(error) => {
                warn!("{}: {:#}", path.display(), error);
                stats.files_failed += 1;
                failures.push((path.clone(), format!("{:#}", error)));
            }
        }

        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    for (path, report) in reports.iter().filter(|(_, r)| !r.warnings.is_empty()) {
        println!("{}", path.display().to_string().yellow());
        for warning in &report.warnings {
            println!("  {}", warning);
        }
    }
    for (path, message) in &failures {
        println!("{} {}: {}", "FAILED".red().bold(), path.display(), message);
    }

    stats.processing_time = start_time.elapsed();
    print_summary(&stats);
    Ok(stats)
}

/// Decode one file and clean the history of every site in it
pub fn check_file(path: &Path, format: InputFormat, config: &Config) -> Result<FileReport> {
    let loaded = load_file(path, format, config)?;
    let mut report = FileReport {
        sites: loaded.sites.len(),
        warnings: loaded.warnings.iter().map(ToString::to_string).collect(),
    };

    for mut site in loaded.sites {
        clean_site_history(&mut site, &config.history)
            .with_context(|| format!("Equipment history of {} is inconsistent", site.site_code()))?;
        let code = site.site_code();
        report
            .warnings
            .extend(site.warnings.iter().map(|w| format!("{}: {}", code, w)));
    }

    Ok(report)
}

fn print_summary(stats: &CommandStats) {
    let failed = if stats.files_failed > 0 {
        format!("{} failed", stats.files_failed).red().bold()
    } else {
        "0 failed".green()
    };
    println!(
        "{} {} files checked: {} ok, {}, {} warnings ({:.2}s)",
        "Summary:".bold(),
        stats.files_processed + stats.files_failed,
        stats.files_processed.to_string().green(),
        failed,
        stats.warnings.to_string().yellow(),
        stats.processing_time.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = include_str!("../../../tests/fixtures/abmf00glp_20200101.log");

    #[test]
    fn test_check_file_reports_cleaning_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abmf00glp_20200101.log");
        std::fs::write(&path, SAMPLE_LOG).unwrap();

        let report = check_file(&path, InputFormat::Auto, &Config::default()).unwrap();

        assert_eq!(report.sites, 1);
        assert_eq!(report.warnings.len(), 3);
        assert!(report.warnings.iter().all(|w| w.starts_with("ABMF: ")));
    }

    #[test]
    fn test_check_file_fails_on_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abmf00glp_20200101.log");
        let overlapping = SAMPLE_LOG.replacen(
            "Date Removed             : 2009-10-15T20:00Z",
            "Date Removed             : 2010-10-15T20:00Z",
            1,
        );
        assert_ne!(overlapping, SAMPLE_LOG);
        std::fs::write(&path, overlapping).unwrap();

        let error = check_file(&path, InputFormat::Auto, &Config::default()).unwrap_err();
        assert!(format!("{:#}", error).contains("ABMF"));

        let mut forced = Config::default();
        forced.history.force = true;
        assert!(check_file(&path, InputFormat::Auto, &forced).is_ok());
    }
}
