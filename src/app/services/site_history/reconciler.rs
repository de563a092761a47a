//! Station-info interval reconciliation
//!
//! Every installation of a receiver or antenna that is not equivalent to the
//! device it replaces is a cut date. The cleaned timelines are swept over the
//! sorted cut dates, and each span is labelled with the devices in service
//! just before its end, so firmware-only or duplicate entries merge into the
//! surrounding interval. Gaps between two devices of one kind are bridged by
//! the earlier device; the span before the first device of a kind is
//! installed is bridged by that first device.

use crate::app::models::site::Site;
use crate::app::models::{
    Antenna, Device, ObservationTechnique, Receiver, StationInterval, TimeRange,
};
use crate::config::ReconcileConfig;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Derive the station-info intervals of a cleaned site
pub fn station_intervals<'a>(
    site: &'a Site,
    config: &ReconcileConfig,
) -> Result<Vec<StationInterval<'a>>> {
    let receivers = &site.receivers;
    let antennas = &site.antennas;
    if receivers.is_empty() || antennas.is_empty() {
        return Err(Error::internal(format!(
            "{} has {} receivers and {} antennas, need at least one of each",
            site.site_code(),
            receivers.len(),
            antennas.len()
        )));
    }

    let start = earliest_installation(receivers)?.min(earliest_installation(antennas)?);

    // The station ends with whichever timeline is closed first
    let end = match TimeRange::cmp_removed(last_removal(receivers), last_removal(antennas)) {
        Ordering::Greater => last_removal(antennas),
        _ => last_removal(receivers),
    };

    let mut cuts = change_dates(receivers, config)?;
    cuts.extend(change_dates(antennas, config)?);
    cuts.sort();
    cuts.dedup();
    cuts.retain(|cut| end.is_none_or(|end| *cut < end));

    let mut intervals = Vec::with_capacity(cuts.len() + 1);
    let mut from = start;
    for to in cuts.into_iter().map(Some).chain(std::iter::once(end)) {
        if to.is_some_and(|to| to <= from) {
            continue;
        }
        let receiver = in_service_before(receivers, to);
        let antenna = in_service_before(antennas, to);
        intervals.push(interval(site, from, to, receiver, antenna));
        if let Some(to) = to {
            from = to;
        }
    }

    info!(
        "Reconciled {} receivers and {} antennas of {} into {} intervals",
        receivers.len(),
        antennas.len(),
        site.site_code(),
        intervals.len()
    );
    Ok(intervals)
}

fn interval<'a>(
    site: &'a Site,
    from: DateTime<Utc>,
    to: Option<DateTime<Utc>>,
    receiver: &'a Receiver,
    antenna: &'a Antenna,
) -> StationInterval<'a> {
    StationInterval {
        site_code: site.site_code(),
        station_name: site.station_name(),
        domes_number: site.domes_number(),
        from,
        to,
        receiver,
        antenna,
        technique: ObservationTechnique::Gnss,
    }
}

/// Installation dates at which the configuration of one device kind changes
fn change_dates<D: Device>(devices: &[D], config: &ReconcileConfig) -> Result<Vec<DateTime<Utc>>> {
    let mut dates = Vec::new();
    for (index, pair) in devices.windows(2).enumerate() {
        if pair[0].is_equivalent(&pair[1], config) {
            continue;
        }
        let date = installation(&pair[1], index + 1)?;
        debug!("{} change at {}", D::KIND, date);
        dates.push(date);
    }
    Ok(dates)
}

/// Last device installed strictly before `until`, or the first device when none is
///
/// Relies on the installation dates being strictly increasing, which cleaning
/// guarantees.
fn in_service_before<D: Device>(devices: &[D], until: Option<DateTime<Utc>>) -> &D {
    let installed = match until {
        Some(until) => devices.partition_point(|device| {
            device.time_range().installed.is_some_and(|installed| installed < until)
        }),
        None => devices.len(),
    };
    &devices[installed.saturating_sub(1)]
}

fn last_removal<D: Device>(devices: &[D]) -> Option<DateTime<Utc>> {
    devices.last().and_then(|device| device.time_range().removed)
}

fn installation<D: Device>(device: &D, index: usize) -> Result<DateTime<Utc>> {
    device.time_range().installed.ok_or_else(|| {
        Error::internal(format!(
            "{} {} ({}) has no installation date",
            D::KIND,
            index,
            device.designator()
        ))
    })
}

fn earliest_installation<D: Device>(devices: &[D]) -> Result<DateTime<Utc>> {
    let mut earliest: Option<DateTime<Utc>> = None;
    for (index, device) in devices.iter().enumerate() {
        let installed = installation(device, index)?;
        earliest = Some(earliest.map_or(installed, |e| e.min(installed)));
    }
    earliest.ok_or_else(|| Error::internal(format!("no {} installed", D::KIND)))
}
