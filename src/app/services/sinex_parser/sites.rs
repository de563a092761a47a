//! Site assembly from SINEX site blocks
//!
//! Collects SITE/ID, SITE/RECEIVER, SITE/ANTENNA and SITE/ECCENTRICITY records
//! into one `Site` per station code. Record decode failures are kept as
//! warnings; only structural errors abort.

use super::header::{FileReference, Header};
use super::reader::SinexReader;
use super::records::{
    FromSinexLine, SiteAntenna, SiteEccentricity, SiteId, SiteReceiver, SolutionEpoch,
    SolutionEstimate,
};
use crate::app::models::Warning;
use crate::app::models::site::Site;
use crate::constants::sinex;
use crate::{Error, Result};
use std::collections::HashMap;
use std::io::BufRead;
use tracing::{debug, info, warn};

/// Everything decoded from one SINEX file
#[derive(Debug, Clone)]
pub struct SinexSites {
    pub header: Header,
    pub file_reference: FileReference,
    /// Sites in order of first appearance
    pub sites: Vec<Site>,
    pub epochs: Vec<SolutionEpoch>,
    pub estimates: Vec<SolutionEstimate>,
    /// Records that could not be decoded and file-level inconsistencies
    pub warnings: Vec<Warning>,
}

impl SinexSites {
    /// Look up a site by its four character code
    pub fn site(&self, code: &str) -> Option<&Site> {
        let code = code.to_uppercase();
        self.sites.iter().find(|site| site.site_code() == code)
    }

    /// Take ownership of a site by its four character code
    pub fn take_site(&mut self, code: &str) -> Option<Site> {
        let code = code.to_uppercase();
        let index = self.sites.iter().position(|site| site.site_code() == code)?;
        Some(self.sites.remove(index))
    }
}

/// Decode all sites of a SINEX file
pub fn decode_sinex_sites<R: BufRead>(input: R) -> Result<SinexSites> {
    let mut reader = SinexReader::new(input)?;
    let mut assembly = SiteAssembly::default();
    let mut warnings = Vec::new();
    let mut eccentricities = Vec::new();
    let mut epochs = Vec::new();
    let mut estimates = Vec::new();

    while reader.advance_block()? {
        let block = reader.current_block().to_string();
        match block.as_str() {
            sinex::SITE_ID => {
                let (ids, skipped) = read_records::<_, SiteId>(&mut reader)?;
                warnings.extend(skipped);
                for id in ids {
                    assembly.apply_site_id(id);
                }
            }
            sinex::SITE_RECEIVER => {
                let (records, skipped) = read_records::<_, SiteReceiver>(&mut reader)?;
                warnings.extend(skipped);
                for record in records {
                    let code = record.key.code.clone();
                    assembly.site_mut(&code).receivers.push(record.into_receiver());
                }
            }
            sinex::SITE_ANTENNA => {
                let (records, skipped) = read_records::<_, SiteAntenna>(&mut reader)?;
                warnings.extend(skipped);
                for record in records {
                    let code = record.key.code.clone();
                    assembly.site_mut(&code).antennas.push(record.into_antenna());
                }
            }
            sinex::SITE_ECCENTRICITY => {
                let (records, skipped) = read_records::<_, SiteEccentricity>(&mut reader)?;
                warnings.extend(skipped);
                eccentricities.extend(records);
            }
            sinex::SOLUTION_EPOCHS => {
                let (records, skipped) = read_records::<_, SolutionEpoch>(&mut reader)?;
                warnings.extend(skipped);
                epochs.extend(records);
            }
            sinex::SOLUTION_ESTIMATE => {
                let (records, skipped) = read_records::<_, SolutionEstimate>(&mut reader)?;
                warnings.extend(skipped);
                estimates.extend(records);
            }
            other => {
                debug!("Skipping block {}", other);
            }
        }
    }

    warnings.extend(
        eccentricities
            .into_iter()
            .filter_map(|eccentricity| assembly.apply_eccentricity(eccentricity)),
    );
    assembly.apply_estimates(&estimates);

    let header = reader.header().clone();
    if !estimates.is_empty() && estimates.len() != header.num_estimates {
        warnings.push(Warning::new(
            sinex::SOLUTION_ESTIMATE,
            format!(
                "header declares {} estimates, block contains {}",
                header.num_estimates,
                estimates.len()
            ),
        ));
    }
    for epoch in &epochs {
        if let Some(mean) = epoch.mean_epoch {
            if !header.covers(mean) {
                warnings.push(Warning::new(
                    sinex::SOLUTION_EPOCHS,
                    format!(
                        "mean epoch {} of {} lies outside the file's data span",
                        mean, epoch.key.code
                    ),
                ));
            }
        }
    }

    info!(
        "Decoded {} sites from SINEX ({} warnings)",
        assembly.sites.len(),
        warnings.len()
    );

    Ok(SinexSites {
        header,
        file_reference: reader.file_reference().clone(),
        sites: assembly.sites,
        epochs,
        estimates,
        warnings,
    })
}

/// Decode every data line of the current block, returning failures as warnings
fn read_records<R: BufRead, T: FromSinexLine>(
    reader: &mut SinexReader<R>,
) -> Result<(Vec<T>, Vec<Warning>)> {
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    while reader.advance_record()? {
        match reader.decode::<T>() {
            Ok(record) => records.push(record),
            Err(Error::Format {
                line,
                field,
                raw,
                cause,
            }) => {
                warn!("Skipping {} record at line {}: {}", reader.current_block(), line, cause);
                warnings.push(Warning::at_line(
                    line,
                    field,
                    format!("{} record skipped, '{}': {}", reader.current_block(), raw, cause),
                ));
            }
            Err(other) => return Err(other),
        }
    }
    Ok((records, warnings))
}

#[derive(Debug, Default)]
struct SiteAssembly {
    sites: Vec<Site>,
    index: HashMap<String, usize>,
}

impl SiteAssembly {
    fn site_mut(&mut self, code: &str) -> &mut Site {
        let position = match self.index.get(code) {
            Some(&position) => position,
            None => {
                self.sites.push(Site::with_code(code));
                self.index.insert(code.to_string(), self.sites.len() - 1);
                self.sites.len() - 1
            }
        };
        &mut self.sites[position]
    }

    fn apply_site_id(&mut self, id: SiteId) {
        let site = self.site_mut(&id.code);
        site.identification.site_name = id.description;
        site.identification.domes_number = id.domes_number;
        site.location.latitude = id.latitude;
        site.location.longitude = id.longitude;
        site.location.elevation = id.height;
    }

    /// Attach eccentricities to antennas installed within their validity range
    fn apply_eccentricity(&mut self, eccentricity: SiteEccentricity) -> Option<Warning> {
        let Some(&position) = self.index.get(&eccentricity.key.code) else {
            return Some(Warning::new(
                sinex::SITE_ECCENTRICITY,
                format!("no antenna listed for site {}", eccentricity.key.code),
            ));
        };

        let range = eccentricity.key.time_range;
        let mut matched = 0;
        for antenna in &mut self.sites[position].antennas {
            let applies = match antenna.time_range.installed {
                Some(installed) => range.contains(installed),
                None => range.installed.is_none(),
            };
            if applies {
                antenna.marker_arp_up = eccentricity.up;
                antenna.marker_arp_north = eccentricity.north;
                antenna.marker_arp_east = eccentricity.east;
                matched += 1;
            }
        }

        (matched == 0).then(|| {
            Warning::new(
                sinex::SITE_ECCENTRICITY,
                format!(
                    "eccentricity for {} matches no antenna period",
                    eccentricity.key.code
                ),
            )
        })
    }

    /// Fill approximate positions from STAX/STAY/STAZ estimates
    fn apply_estimates(&mut self, estimates: &[SolutionEstimate]) {
        for estimate in estimates {
            let Some(&position) = self.index.get(&estimate.code) else {
                continue;
            };
            let location = &mut self.sites[position].location;
            let slot = match estimate.parameter.as_str() {
                "STAX" => &mut location.x,
                "STAY" => &mut location.y,
                "STAZ" => &mut location.z,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(estimate.value);
            }
        }
    }
}
