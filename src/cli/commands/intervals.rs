//! Intervals command: print the reconciled station-info intervals of a file

use super::shared::{CommandStats, format_time, load_file};
use crate::app::models::StationInterval;
use crate::app::services::site_history::{clean_site_history, station_intervals};
use crate::cli::args::IntervalsArgs;
use anyhow::{Context, Result, bail};
use std::fmt::Write;
use std::time::Instant;
use tracing::{info, warn};

pub fn run_intervals(args: IntervalsArgs) -> Result<CommandStats> {
    let start_time = Instant::now();
    let config = args.to_config()?;

    let loaded = load_file(&args.path, args.format, &config)?;
    for warning in &loaded.warnings {
        warn!("{}: {}", args.path.display(), warning);
    }

    let mut sites = loaded.sites;
    if let Some(code) = &args.site {
        let code = code.to_uppercase();
        sites.retain(|site| site.site_code() == code);
        if sites.is_empty() {
            bail!("Site {} not found in {}", code, args.path.display());
        }
    }

    let mut stats = CommandStats {
        files_processed: 1,
        warnings: loaded.warnings.len(),
        ..CommandStats::default()
    };

    for mut site in sites {
        if site.receivers.is_empty() || site.antennas.is_empty() {
            warn!("Skipping {}: no receiver or antenna history", site.site_code());
            continue;
        }

        clean_site_history(&mut site, &config.history)
            .with_context(|| format!("Failed to clean equipment history of {}", site.site_code()))?;
        for warning in &site.warnings {
            warn!("{}: {}", site.site_code(), warning);
        }

        let intervals = station_intervals(&site, &config.reconcile)
            .with_context(|| format!("Failed to reconcile intervals of {}", site.site_code()))?;
        print!("{}", format_interval_table(&intervals));

        stats.sites_processed += 1;
        stats.warnings += site.warnings.len();
        stats.intervals_reported += intervals.len();
    }

    stats.processing_time = start_time.elapsed();
    info!(
        "Reported {} intervals for {} sites in {:.2}s",
        stats.intervals_reported,
        stats.sites_processed,
        stats.processing_time.as_secs_f64()
    );
    Ok(stats)
}

/// Plain-text table with one row per interval
pub fn format_interval_table(intervals: &[StationInterval<'_>]) -> String {
    let mut table = format!(
        "{:<4}  {:<19}  {:<19}  {:<20}  {:<11}  {:<20}  {:>8}  {:>8}  {:>8}\n",
        "SITE", "FROM", "TO", "RECEIVER", "FIRMWARE", "ANTENNA", "UP", "NORTH", "EAST"
    );

    for interval in intervals {
        let antenna = interval.antenna;
        // Writing to a String cannot fail
        let _ = writeln!(
            table,
            "{:<4}  {:<19}  {:<19}  {:<20}  {:<11}  {:<20}  {:>8.4}  {:>8.4}  {:>8.4}",
            interval.site_code,
            format_time(Some(interval.from)),
            format_time(interval.to),
            interval.receiver.receiver_type,
            interval.receiver.firmware,
            antenna.type_with_radome(),
            antenna.marker_arp_up,
            antenna.marker_arp_north,
            antenna.marker_arp_east,
        );
    }
    table
}
