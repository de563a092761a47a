//! Block states and per-block field tables
//!
//! `BlockState` records which part of the log the parser is in and holds the
//! sub-block entry being filled. Field routing never touches a shared warning
//! list: every call hands its outcome back to the parser.

use super::field_parsers::{
    ValuePatterns, clean_value, parse_compact_angle, parse_date, parse_effective_dates,
    parse_satellite_systems, split_antenna_type,
};
use super::line::Caption;
use crate::app::models::site::{
    Collocation, Contact, EpisodicEvent, FrequencyStandard, LocalTie, MetSensor, MetSensorKind,
    Site,
};
use crate::app::models::{Antenna, Receiver, TimeRange, Warning};
use crate::constants::sitelog::NO_RADOME;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// A `key : value` pair ready for routing
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub line: usize,
    /// Key as written in the log
    pub key: &'a str,
    /// Normalized key
    pub name: &'a str,
    /// Value with placeholders removed
    pub value: &'a str,
}

impl<'a> Field<'a> {
    pub fn new(line: usize, key: &'a str, name: &'a str, value: &'a str) -> Self {
        Self {
            line,
            key,
            name,
            value: clean_value(value),
        }
    }

    fn warning(&self, cause: impl std::fmt::Display) -> Warning {
        Warning::at_line(
            self.line,
            self.key,
            format!("ignoring '{}': {}", self.value, cause),
        )
    }

    fn error(&self, cause: impl Into<String>) -> Error {
        Error::format(self.line, self.key, self.value, cause)
    }
}

/// What happened to a routed field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    Stored,
    /// Stored as unset because the value could not be read
    Warned(Warning),
    /// The block has no such key
    Unknown,
}

/// Contact person being filled in blocks 11 and 12
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactSlot {
    #[default]
    Primary,
    Secondary,
}

/// Part of the log the parser is in
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BlockState {
    /// Preamble, unmodelled blocks and unfilled template entries
    #[default]
    Ignore,
    Form,
    Identification,
    Location,
    Receiver(Receiver),
    Antenna {
        antenna: Antenna,
        /// Radome found in columns 17-20 of the antenna type
        type_radome: Option<String>,
    },
    LocalTie(LocalTie),
    FrequencyStandard(FrequencyStandard),
    Collocation(Collocation),
    MetSensor(MetSensor),
    OtherInstrumentation,
    EpisodicEvent(EpisodicEvent),
    Agency {
        responsible: bool,
        contact: ContactSlot,
    },
    MoreInformation {
        /// Everything after the antenna graphics caption is kept verbatim
        graphics: bool,
    },
}

impl BlockState {
    /// State entered by a block heading
    pub fn for_block(number: u8) -> BlockState {
        match number {
            0 => BlockState::Form,
            1 => BlockState::Identification,
            2 => BlockState::Location,
            3 => BlockState::Receiver(Receiver::default()),
            4 => BlockState::Antenna {
                antenna: Antenna::default(),
                type_radome: None,
            },
            5 => BlockState::LocalTie(LocalTie::default()),
            6 => BlockState::FrequencyStandard(FrequencyStandard::default()),
            7 => BlockState::Collocation(Collocation::default()),
            8 => BlockState::Ignore,
            10 => BlockState::EpisodicEvent(EpisodicEvent::default()),
            11 => BlockState::Agency {
                responsible: false,
                contact: ContactSlot::Primary,
            },
            12 => BlockState::Agency {
                responsible: true,
                contact: ContactSlot::Primary,
            },
            13 => BlockState::MoreInformation { graphics: false },
            _ => BlockState::Ignore,
        }
    }

    /// State entered by a sub-block label such as `3.2` or `8.3.1`
    pub fn for_sub_block(label: &str) -> BlockState {
        let mut parts = label.split('.');
        let block = parts.next().and_then(|part| part.parse::<u8>().ok());
        let sub = parts.next().and_then(|part| part.parse::<u8>().ok());

        match (block, sub) {
            (Some(8), Some(kind)) => {
                let kind = match kind {
                    1 => MetSensorKind::Humidity,
                    2 => MetSensorKind::Pressure,
                    3 => MetSensorKind::Temperature,
                    4 => MetSensorKind::WaterVaporRadiometer,
                    5 => return BlockState::OtherInstrumentation,
                    _ => return BlockState::Ignore,
                };
                BlockState::MetSensor(MetSensor {
                    kind,
                    ..MetSensor::default()
                })
            }
            (Some(number), Some(_)) => BlockState::for_block(number),
            _ => BlockState::Ignore,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, BlockState::Ignore)
    }

    /// Whether all remaining lines belong to the antenna graphics
    pub fn is_graphics(&self) -> bool {
        matches!(self, BlockState::MoreInformation { graphics: true })
    }

    /// React to a structural caption
    pub fn apply_caption(&mut self, caption: Caption) {
        match (self, caption) {
            (BlockState::Agency { contact, .. }, Caption::PrimaryContact) => {
                *contact = ContactSlot::Primary;
            }
            (BlockState::Agency { contact, .. }, Caption::SecondaryContact) => {
                *contact = ContactSlot::Secondary;
            }
            (BlockState::MoreInformation { graphics }, Caption::AntennaGraphics) => {
                *graphics = true;
            }
            _ => {}
        }
    }

    /// Text field addressed by a normalized key, if the key names one
    pub fn text_field<'s>(&'s mut self, site: &'s mut Site, name: &str) -> Option<&'s mut String> {
        let slot = match self {
            BlockState::Ignore => return None,
            BlockState::Form => {
                let form = &mut site.form;
                match name {
                    n if n.starts_with("preparedby") => &mut form.prepared_by,
                    "reporttype" => &mut form.report_type,
                    "previoussitelog" => &mut form.previous_site_log,
                    n if n.starts_with("modifiedadded") => &mut form.modified_sections,
                    _ => return None,
                }
            }
            BlockState::Identification => {
                let id = &mut site.identification;
                match name {
                    "sitename" => &mut id.site_name,
                    "fourcharacterid" => &mut id.four_character_id,
                    "ninecharacterid" => &mut id.nine_character_id,
                    "monumentinscription" => &mut id.monument_inscription,
                    "iersdomesnumber" | "domesnumber" => &mut id.domes_number,
                    "cdpnumber" => &mut id.cdp_number,
                    "monumentdescription" => &mut id.monument_description,
                    "monumentfoundation" => &mut id.monument_foundation,
                    "markerdescription" => &mut id.marker_description,
                    "geologiccharacteristic" => &mut id.geologic_characteristic,
                    "bedrocktype" => &mut id.bedrock_type,
                    "bedrockcondition" => &mut id.bedrock_condition,
                    "fracturespacing" => &mut id.fracture_spacing,
                    "faultzonesnearby" => &mut id.fault_zones_nearby,
                    "distanceactivity" => &mut id.distance_activity,
                    "additionalinformation" => &mut id.notes,
                    _ => return None,
                }
            }
            BlockState::Location => {
                let location = &mut site.location;
                match name {
                    "cityortown" => &mut location.city,
                    "stateorprovince" => &mut location.state,
                    n if n.starts_with("country") => &mut location.country,
                    "tectonicplate" => &mut location.tectonic_plate,
                    "additionalinformation" => &mut location.notes,
                    _ => return None,
                }
            }
            BlockState::Receiver(receiver) => match name {
                "receivertype" => &mut receiver.receiver_type,
                "serialnumber" => &mut receiver.serial_number,
                "firmwareversion" => &mut receiver.firmware,
                n if n.starts_with("temperaturestabiliz") => {
                    &mut receiver.temperature_stabilization
                }
                "additionalinformation" => &mut receiver.notes,
                _ => return None,
            },
            BlockState::Antenna { antenna, .. } => match name {
                "serialnumber" => &mut antenna.serial_number,
                "antennareferencepoint" => &mut antenna.reference_point,
                "antennaradometype" => &mut antenna.radome,
                "radomeserialnumber" => &mut antenna.radome_serial_number,
                "antennacabletype" => &mut antenna.cable_type,
                "additionalinformation" => &mut antenna.notes,
                _ => return None,
            },
            BlockState::LocalTie(tie) => match name {
                "tiedmarkername" => &mut tie.marker_name,
                "tiedmarkerusage" => &mut tie.marker_usage,
                "tiedmarkercdpnumber" => &mut tie.cdp_number,
                "tiedmarkerdomesnumber" => &mut tie.domes_number,
                "surveymethod" => &mut tie.survey_method,
                "additionalinformation" => &mut tie.notes,
                _ => return None,
            },
            BlockState::FrequencyStandard(standard) => match name {
                "standardtype" => &mut standard.standard_type,
                "inputfrequency" => &mut standard.input_frequency,
                "notes" => &mut standard.notes,
                _ => return None,
            },
            BlockState::Collocation(collocation) => match name {
                "instrumentationtype" => &mut collocation.instrumentation_type,
                "status" => &mut collocation.status,
                "notes" => &mut collocation.notes,
                _ => return None,
            },
            BlockState::MetSensor(sensor) => match name {
                "humiditysensormodel"
                | "pressuresensormodel"
                | "tempsensormodel"
                | "temperaturesensormodel"
                | "watervaporradiometer" => &mut sensor.model,
                "manufacturer" => &mut sensor.manufacturer,
                "serialnumber" => &mut sensor.serial_number,
                n if n.starts_with("accuracy") => &mut sensor.accuracy,
                "aspiration" => &mut sensor.aspiration,
                "notes" => &mut sensor.notes,
                _ => return None,
            },
            BlockState::OtherInstrumentation => match name {
                "otherinstrumentation" => &mut site.other_instrumentation,
                _ => return None,
            },
            BlockState::EpisodicEvent(event) => match name {
                "event" => &mut event.event,
                _ => return None,
            },
            BlockState::Agency {
                responsible,
                contact,
            } => {
                let agency = if *responsible {
                    &mut site.responsible_agency
                } else {
                    &mut site.contact_agency
                };
                let person: &mut Contact = match contact {
                    ContactSlot::Primary => &mut agency.primary_contact,
                    ContactSlot::Secondary => &mut agency.secondary_contact,
                };
                match name {
                    "agency" => &mut agency.agency,
                    "preferredabbreviation" => &mut agency.preferred_abbreviation,
                    "mailingaddress" => &mut agency.mailing_address,
                    "additionalinformation" => &mut agency.notes,
                    "contactname" => &mut person.name,
                    "telephoneprimary" => &mut person.telephone_primary,
                    "telephonesecondary" => &mut person.telephone_secondary,
                    "fax" => &mut person.fax,
                    "email" => &mut person.email,
                    _ => return None,
                }
            }
            BlockState::MoreInformation { .. } => {
                let info = &mut site.more_information;
                match name {
                    "primarydatacenter" => &mut info.primary_data_center,
                    "secondarydatacenter" => &mut info.secondary_data_center,
                    n if n.starts_with("urlformore") => &mut info.url,
                    "sitemap" => &mut info.site_map,
                    "sitediagram" => &mut info.site_diagram,
                    "horizonmask" => &mut info.horizon_mask,
                    "monumentdescription" => &mut info.monument_description,
                    "sitepictures" => &mut info.site_pictures,
                    "additionalinformation" => &mut info.notes,
                    "antennagraphics" => &mut info.antenna_graphics,
                    _ => return None,
                }
            }
        };
        Some(slot)
    }

    /// Route one field of the current block
    ///
    /// Unreadable required values fail; unreadable descriptive values are
    /// stored as unset and reported as a warning.
    pub fn apply_field(
        &mut self,
        site: &mut Site,
        field: &Field<'_>,
        values: &ValuePatterns,
    ) -> Result<FieldOutcome> {
        if let Some(slot) = self.text_field(site, field.name) {
            *slot = field.value.to_string();
            return Ok(FieldOutcome::Stored);
        }

        let name = field.name;
        match self {
            BlockState::Ignore => Ok(FieldOutcome::Stored),
            BlockState::Form => match name {
                "dateprepared" => Ok(descriptive_date(field, &mut site.form.date_prepared)),
                _ => Ok(FieldOutcome::Unknown),
            },
            BlockState::Identification => {
                let id = &mut site.identification;
                match name {
                    n if n.starts_with("heightofthemonument") => {
                        Ok(descriptive_number(field, values, &mut id.monument_height))
                    }
                    n if n.starts_with("foundationdepth") => {
                        Ok(descriptive_number(field, values, &mut id.foundation_depth))
                    }
                    "dateinstalled" => Ok(descriptive_date(field, &mut id.date_installed)),
                    _ => Ok(FieldOutcome::Unknown),
                }
            }
            BlockState::Location => {
                let location = &mut site.location;
                match name {
                    n if n.starts_with("xcoordinate") => {
                        required_number(field, values, &mut location.x)
                    }
                    n if n.starts_with("ycoordinate") => {
                        required_number(field, values, &mut location.y)
                    }
                    n if n.starts_with("zcoordinate") => {
                        required_number(field, values, &mut location.z)
                    }
                    n if n.starts_with("latitude") => {
                        Ok(descriptive_angle(field, &mut location.latitude))
                    }
                    n if n.starts_with("longitude") => {
                        Ok(descriptive_angle(field, &mut location.longitude))
                    }
                    n if n.starts_with("elevation") => {
                        Ok(descriptive_number(field, values, &mut location.elevation))
                    }
                    _ => Ok(FieldOutcome::Unknown),
                }
            }
            BlockState::Receiver(receiver) => match name {
                n if n.starts_with("satellitesystem") => {
                    receiver.satellite_systems =
                        parse_satellite_systems(field.value).map_err(|e| field.error(e))?;
                    Ok(FieldOutcome::Stored)
                }
                n if n.starts_with("elevationcutoff") => Ok(descriptive_number(
                    field,
                    values,
                    &mut receiver.elevation_cutoff,
                )),
                "dateinstalled" => required_date(field, &mut receiver.time_range.installed),
                "dateremoved" => required_date(field, &mut receiver.time_range.removed),
                _ => Ok(FieldOutcome::Unknown),
            },
            BlockState::Antenna {
                antenna,
                type_radome,
            } => match name {
                "antennatype" => {
                    let (model, radome) = split_antenna_type(field.value);
                    antenna.antenna_type = model.to_string();
                    *type_radome = radome.map(str::to_string);
                    Ok(FieldOutcome::Stored)
                }
                n if n.starts_with("markerarpup") => {
                    required_eccentricity(field, values, &mut antenna.marker_arp_up)
                }
                n if n.starts_with("markerarpnorth") => {
                    required_eccentricity(field, values, &mut antenna.marker_arp_north)
                }
                n if n.starts_with("markerarpeast") => {
                    required_eccentricity(field, values, &mut antenna.marker_arp_east)
                }
                n if n.starts_with("alignmentfromtrue") => Ok(descriptive_number(
                    field,
                    values,
                    &mut antenna.alignment_from_true_north,
                )),
                n if n.starts_with("antennacablelength") => {
                    Ok(descriptive_number(field, values, &mut antenna.cable_length))
                }
                "dateinstalled" => required_date(field, &mut antenna.time_range.installed),
                "dateremoved" => required_date(field, &mut antenna.time_range.removed),
                _ => Ok(FieldOutcome::Unknown),
            },
            BlockState::LocalTie(tie) => match name {
                n if n.starts_with("dx") => Ok(descriptive_number(field, values, &mut tie.dx)),
                n if n.starts_with("dy") => Ok(descriptive_number(field, values, &mut tie.dy)),
                n if n.starts_with("dz") => Ok(descriptive_number(field, values, &mut tie.dz)),
                n if n.starts_with("accuracy") => {
                    Ok(descriptive_number(field, values, &mut tie.accuracy_mm))
                }
                "datemeasured" => Ok(descriptive_date(field, &mut tie.date_measured)),
                _ => Ok(FieldOutcome::Unknown),
            },
            BlockState::FrequencyStandard(standard) => match name {
                "effectivedates" => Ok(descriptive_range(field, &mut standard.effective_dates)),
                _ => Ok(FieldOutcome::Unknown),
            },
            BlockState::Collocation(collocation) => match name {
                "effectivedates" => {
                    Ok(descriptive_range(field, &mut collocation.effective_dates))
                }
                _ => Ok(FieldOutcome::Unknown),
            },
            BlockState::MetSensor(sensor) => match name {
                n if n.starts_with("datasamplinginterval") => Ok(descriptive_number(
                    field,
                    values,
                    &mut sensor.data_sampling_interval,
                )),
                n if n.starts_with("heightdifftoant") => Ok(descriptive_number(
                    field,
                    values,
                    &mut sensor.height_diff_to_antenna,
                )),
                n if n.starts_with("distancetoantenna") => Ok(descriptive_number(
                    field,
                    values,
                    &mut sensor.distance_to_antenna,
                )),
                "calibrationdate" => Ok(descriptive_date(field, &mut sensor.calibration_date)),
                "effectivedates" => Ok(descriptive_range(field, &mut sensor.effective_dates)),
                _ => Ok(FieldOutcome::Unknown),
            },
            BlockState::EpisodicEvent(event) => match name {
                "date" => Ok(descriptive_range(field, &mut event.dates)),
                _ => Ok(FieldOutcome::Unknown),
            },
            BlockState::OtherInstrumentation
            | BlockState::Agency { .. }
            | BlockState::MoreInformation { .. } => Ok(FieldOutcome::Unknown),
        }
    }

    /// Move the entry being filled into the site, if it identifies itself
    ///
    /// The state keeps its kind with a fresh entry so that the next sub-block
    /// of the same block can be filled.
    pub fn commit(&mut self, site: &mut Site) -> Vec<Warning> {
        let mut warnings = Vec::new();
        match self {
            BlockState::Receiver(receiver) => {
                let receiver = std::mem::take(receiver);
                if !receiver.receiver_type.is_empty() {
                    debug!("Receiver {} committed", receiver.receiver_type);
                    site.receivers.push(receiver);
                } else if receiver != Receiver::default() {
                    warnings.push(dropped_entry("Receiver Type", "receiver"));
                }
            }
            BlockState::Antenna {
                antenna,
                type_radome,
            } => {
                let mut antenna = std::mem::take(antenna);
                let type_radome = type_radome.take();
                if antenna.antenna_type.is_empty() {
                    if antenna != Antenna::default() {
                        warnings.push(dropped_entry("Antenna Type", "antenna"));
                    }
                    return warnings;
                }

                match (type_radome, antenna.radome.is_empty()) {
                    (Some(radome), true) => antenna.radome = radome,
                    (Some(radome), false) if radome != antenna.radome => {
                        warnings.push(Warning::new(
                            "Antenna Radome Type",
                            format!(
                                "antenna type {} carries radome {} but radome field says {}; using {}",
                                antenna.antenna_type, radome, antenna.radome, antenna.radome
                            ),
                        ));
                    }
                    (None, true) => antenna.radome = NO_RADOME.to_string(),
                    _ => {}
                }
                debug!("Antenna {} committed", antenna.type_with_radome());
                site.antennas.push(antenna);
            }
            BlockState::LocalTie(tie) => {
                let tie = std::mem::take(tie);
                if !tie.marker_name.is_empty() {
                    site.local_ties.push(tie);
                }
            }
            BlockState::FrequencyStandard(standard) => {
                let standard = std::mem::take(standard);
                if !standard.standard_type.is_empty() {
                    site.frequency_standards.push(standard);
                }
            }
            BlockState::Collocation(collocation) => {
                let collocation = std::mem::take(collocation);
                if !collocation.instrumentation_type.is_empty() {
                    site.collocations.push(collocation);
                }
            }
            BlockState::MetSensor(sensor) => {
                let kind = sensor.kind;
                let sensor = std::mem::replace(
                    sensor,
                    MetSensor {
                        kind,
                        ..MetSensor::default()
                    },
                );
                if !sensor.model.is_empty() {
                    site.met_sensors_mut(kind).push(sensor);
                }
            }
            BlockState::EpisodicEvent(event) => {
                let event = std::mem::take(event);
                if !event.event.is_empty() {
                    site.episodic_events.push(event);
                }
            }
            _ => {}
        }
        warnings
    }
}

/// Keys whose values are prose and may continue on unlabelled lines
pub fn is_free_text(name: &str) -> bool {
    matches!(
        name,
        "additionalinformation"
            | "notes"
            | "otherinstrumentation"
            | "antennagraphics"
            | "distanceactivity"
            | "mailingaddress"
            | "agency"
    )
}

fn dropped_entry(field: &str, kind: &str) -> Warning {
    warn!("Dropping {} entry without {}", kind, field);
    Warning::new(field, format!("{} entry without {} dropped", kind, field))
}

fn descriptive_number(field: &Field<'_>, values: &ValuePatterns, slot: &mut Option<f64>) -> FieldOutcome {
    if field.value.is_empty() {
        *slot = None;
        return FieldOutcome::Stored;
    }
    match values.number(field.value) {
        Ok(number) => {
            *slot = Some(number);
            FieldOutcome::Stored
        }
        Err(cause) => {
            *slot = None;
            FieldOutcome::Warned(field.warning(cause))
        }
    }
}

fn descriptive_angle(field: &Field<'_>, slot: &mut Option<f64>) -> FieldOutcome {
    if field.value.is_empty() {
        *slot = None;
        return FieldOutcome::Stored;
    }
    match parse_compact_angle(field.value) {
        Ok(angle) => {
            *slot = Some(angle);
            FieldOutcome::Stored
        }
        Err(cause) => {
            *slot = None;
            FieldOutcome::Warned(field.warning(cause))
        }
    }
}

fn descriptive_date(field: &Field<'_>, slot: &mut Option<DateTime<Utc>>) -> FieldOutcome {
    match parse_date(field.value) {
        Ok(date) => {
            *slot = date;
            FieldOutcome::Stored
        }
        Err(cause) => {
            *slot = None;
            FieldOutcome::Warned(field.warning(cause))
        }
    }
}

fn descriptive_range(field: &Field<'_>, slot: &mut TimeRange) -> FieldOutcome {
    match parse_effective_dates(field.value) {
        Ok(range) => {
            *slot = range;
            FieldOutcome::Stored
        }
        Err(cause) => {
            *slot = TimeRange::default();
            FieldOutcome::Warned(field.warning(cause))
        }
    }
}

fn required_date(field: &Field<'_>, slot: &mut Option<DateTime<Utc>>) -> Result<FieldOutcome> {
    *slot = parse_date(field.value).map_err(|cause| field.error(cause))?;
    Ok(FieldOutcome::Stored)
}

fn required_number(
    field: &Field<'_>,
    values: &ValuePatterns,
    slot: &mut Option<f64>,
) -> Result<FieldOutcome> {
    if field.value.is_empty() {
        *slot = None;
        return Ok(FieldOutcome::Stored);
    }
    *slot = Some(values.number(field.value).map_err(|cause| field.error(cause))?);
    Ok(FieldOutcome::Stored)
}

fn required_eccentricity(
    field: &Field<'_>,
    values: &ValuePatterns,
    slot: &mut f64,
) -> Result<FieldOutcome> {
    if field.value.is_empty() {
        *slot = 0.0;
        return Ok(FieldOutcome::Warned(
            field.warning("eccentricity missing, assuming 0"),
        ));
    }
    *slot = values.number(field.value).map_err(|cause| field.error(cause))?;
    Ok(FieldOutcome::Stored)
}
