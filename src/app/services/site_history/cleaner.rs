//! Device history cleaning
//!
//! Turns a receiver or antenna list into a strictly increasing timeline:
//! missing boundaries are inferred from neighbours, touching boundaries are
//! separated by the configured shift, and overlaps either fail or, when
//! forced, are cut back.

use crate::app::models::site::Site;
use crate::app::models::{Antenna, Device, Receiver, Warning};
use crate::config::HistoryConfig;
use crate::{Error, Result};
use tracing::{debug, warn};

/// Clean the receiver history in place
pub fn clean_receivers(receivers: &mut [Receiver], config: &HistoryConfig) -> Result<Vec<Warning>> {
    clean_devices(receivers, config)
}

/// Clean the antenna history in place
pub fn clean_antennas(antennas: &mut [Antenna], config: &HistoryConfig) -> Result<Vec<Warning>> {
    clean_devices(antennas, config)
}

/// Clean both device histories of a site and keep the warnings on the site
pub fn clean_site_history(site: &mut Site, config: &HistoryConfig) -> Result<()> {
    let mut warnings = clean_receivers(&mut site.receivers, config)?;
    warnings.extend(clean_antennas(&mut site.antennas, config)?);

    debug!(
        "Cleaned history of {}: {} corrections",
        site.site_code(),
        warnings.len()
    );
    site.add_warnings(warnings);
    Ok(())
}

/// Clean one device list, ordered by installation
pub fn clean_devices<D: Device>(devices: &mut [D], config: &HistoryConfig) -> Result<Vec<Warning>> {
    config.validate()?;
    let shift = config.shift();
    let mut warnings = Vec::new();

    for index in 0..devices.len() {
        // Installation date from the predecessor's removal
        if devices[index].time_range().installed.is_none() {
            if index == 0 {
                return Err(Error::missing_date(D::KIND, index));
            }
            let previous_removed = devices[index - 1]
                .time_range()
                .removed
                .ok_or_else(|| Error::missing_date(D::KIND, index))?;
            let installed = previous_removed + shift;
            devices[index].time_range_mut().installed = Some(installed);
            warnings.push(correction(
                &devices[index],
                index,
                format!("installation date missing, set to {}", installed),
            ));
        }

        // Removal date from the successor's installation
        if devices[index].time_range().removed.is_none() {
            let next_installed = devices
                .get(index + 1)
                .and_then(|next| next.time_range().installed);
            if let Some(next_installed) = next_installed {
                let removed = next_installed - shift;
                if devices[index]
                    .time_range()
                    .installed
                    .is_some_and(|installed| installed > removed)
                {
                    return Err(Error::chronological(D::KIND, index, index + 1));
                }
                devices[index].time_range_mut().removed = Some(removed);
                warnings.push(correction(
                    &devices[index],
                    index,
                    format!("removal date missing, set to {}", removed),
                ));
            }
        }

        let range = *devices[index].time_range();
        if let (Some(installed), Some(removed)) = (range.installed, range.removed) {
            if installed > removed {
                return Err(Error::chronological(D::KIND, index, index));
            }
        }

        if index == 0 {
            continue;
        }
        let (Some(current_installed), Some(previous_removed)) =
            (range.installed, devices[index - 1].time_range().removed)
        else {
            continue;
        };

        if previous_removed > current_installed && !config.force {
            return Err(Error::chronological(D::KIND, index - 1, index));
        }
        if previous_removed >= current_installed {
            let removed = current_installed - shift;
            let previous = devices[index - 1].time_range_mut();
            if previous.installed.is_some_and(|installed| installed > removed) {
                return Err(Error::chronological(D::KIND, index - 1, index));
            }
            previous.removed = Some(removed);

            let reason = if previous_removed == current_installed {
                "removal coincides with next installation"
            } else {
                "removal overlaps next installation"
            };
            warnings.push(correction(
                &devices[index - 1],
                index - 1,
                format!("{}, moved back to {}", reason, removed),
            ));
        }
    }

    Ok(warnings)
}

fn correction<D: Device>(device: &D, index: usize, message: String) -> Warning {
    warn!("{} {} ({}): {}", D::KIND, index, device.designator(), message);
    Warning::new(
        format!("{} {}", D::KIND, index),
        format!("{}: {}", device.designator(), message),
    )
}
