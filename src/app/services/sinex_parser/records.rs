//! Record decoders for the SINEX blocks used by the site history
//!
//! Each record type implements `FromSinexLine` and reads its fields from the
//! fixed byte offsets of the SINEX 2.x layout.

use super::field_parsers::ColumnDecoder;
use crate::app::models::{Antenna, ObservationTechnique, Receiver, TimeRange};
use crate::constants::sitelog::NO_RADOME;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record that can be decoded from one SINEX data line
pub trait FromSinexLine: Sized {
    fn from_line(columns: &ColumnDecoder<'_>) -> Result<Self>;
}

fn technique(columns: &ColumnDecoder<'_>, index: usize) -> Result<Option<ObservationTechnique>> {
    match columns.char_at(index) {
        None => Ok(None),
        Some(code) => ObservationTechnique::from_code(code).map(Some).ok_or_else(|| {
            Error::format(
                columns.line_number(),
                "TECHNIQUE",
                code.to_string(),
                "unknown observation technique",
            )
        }),
    }
}

/// Site code, point code, solution and validity range shared by SITE/* records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteKey {
    pub code: String,
    pub point: String,
    pub solution: String,
    pub technique: Option<ObservationTechnique>,
    pub time_range: TimeRange,
}

impl FromSinexLine for SiteKey {
    fn from_line(columns: &ColumnDecoder<'_>) -> Result<Self> {
        let start = columns.epoch("DATA_START", 16..28)?;
        let end = columns.epoch("DATA_END", 29..41)?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(Error::format(
                    columns.line_number(),
                    "DATA_END",
                    columns.text(29..41),
                    "data end precedes data start",
                ));
            }
        }

        Ok(SiteKey {
            code: columns.required_text("CODE", 1..5)?.to_uppercase(),
            point: columns.text(6..8).to_string(),
            solution: columns.text(9..13).to_string(),
            technique: technique(columns, 14)?,
            time_range: TimeRange::new(start, end),
        })
    }
}

/// SITE/ID record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteId {
    pub code: String,
    pub point: String,
    pub domes_number: String,
    pub technique: Option<ObservationTechnique>,
    pub description: String,
    /// Decimal degrees, east positive in -180..180
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Approximate height in metres
    pub height: Option<f64>,
}

impl FromSinexLine for SiteId {
    fn from_line(columns: &ColumnDecoder<'_>) -> Result<Self> {
        let longitude = columns.angle("APPROX_LON", 44..56)?.map(|lon| {
            if lon > 180.0 { lon - 360.0 } else { lon }
        });

        Ok(SiteId {
            code: columns.required_text("CODE", 1..5)?.to_uppercase(),
            point: columns.text(6..8).to_string(),
            domes_number: columns.text(9..18).to_string(),
            technique: technique(columns, 19)?,
            description: columns.text(21..43).to_string(),
            longitude,
            latitude: columns.angle("APPROX_LAT", 56..68)?,
            height: columns.optional_number("APPROX_H", 68..75)?,
        })
    }
}

/// SITE/RECEIVER record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteReceiver {
    pub key: SiteKey,
    pub receiver_type: String,
    pub serial_number: String,
    pub firmware: String,
}

impl FromSinexLine for SiteReceiver {
    fn from_line(columns: &ColumnDecoder<'_>) -> Result<Self> {
        Ok(SiteReceiver {
            key: SiteKey::from_line(columns)?,
            receiver_type: columns.required_text("RECEIVER_TYPE", 42..62)?.to_string(),
            serial_number: columns.text(63..68).to_string(),
            firmware: columns.text(69..80).to_string(),
        })
    }
}

impl SiteReceiver {
    pub fn into_receiver(self) -> Receiver {
        Receiver {
            receiver_type: self.receiver_type,
            serial_number: self.serial_number,
            firmware: self.firmware,
            time_range: self.key.time_range,
            ..Receiver::default()
        }
    }
}

/// SITE/ANTENNA record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAntenna {
    pub key: SiteKey,
    pub antenna_type: String,
    pub radome: String,
    pub serial_number: String,
}

impl FromSinexLine for SiteAntenna {
    fn from_line(columns: &ColumnDecoder<'_>) -> Result<Self> {
        let radome = match columns.text(58..62) {
            "" => NO_RADOME,
            radome => radome,
        };

        Ok(SiteAntenna {
            key: SiteKey::from_line(columns)?,
            antenna_type: columns.required_text("ANTENNA_TYPE", 42..58)?.to_string(),
            radome: radome.to_string(),
            serial_number: columns.text(63..68).to_string(),
        })
    }
}

impl SiteAntenna {
    pub fn into_antenna(self) -> Antenna {
        Antenna {
            antenna_type: self.antenna_type,
            radome: self.radome,
            serial_number: self.serial_number,
            time_range: self.key.time_range,
            ..Antenna::default()
        }
    }
}

/// SITE/ECCENTRICITY record (marker to ARP, UNE only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteEccentricity {
    pub key: SiteKey,
    pub reference_system: String,
    pub up: f64,
    pub north: f64,
    pub east: f64,
}

impl FromSinexLine for SiteEccentricity {
    fn from_line(columns: &ColumnDecoder<'_>) -> Result<Self> {
        let reference_system = columns.required_text("REF_SYSTEM", 42..45)?;
        if reference_system != "UNE" {
            return Err(Error::format(
                columns.line_number(),
                "REF_SYSTEM",
                reference_system,
                "only UNE eccentricities are supported",
            ));
        }

        Ok(SiteEccentricity {
            key: SiteKey::from_line(columns)?,
            reference_system: reference_system.to_string(),
            up: columns.number("ECC_UP", 46..54)?,
            north: columns.number("ECC_NORTH", 55..63)?,
            east: columns.number("ECC_EAST", 64..72)?,
        })
    }
}

/// SOLUTION/EPOCHS record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionEpoch {
    pub key: SiteKey,
    pub mean_epoch: Option<DateTime<Utc>>,
}

impl FromSinexLine for SolutionEpoch {
    fn from_line(columns: &ColumnDecoder<'_>) -> Result<Self> {
        Ok(SolutionEpoch {
            key: SiteKey::from_line(columns)?,
            mean_epoch: columns.epoch("MEAN_EPOCH", 42..54)?,
        })
    }
}

/// SOLUTION/ESTIMATE record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionEstimate {
    pub index: usize,
    /// Parameter type, e.g. "STAX"
    pub parameter: String,
    pub code: String,
    pub point: String,
    pub solution: String,
    pub reference_epoch: Option<DateTime<Utc>>,
    pub unit: String,
    pub constraint_code: Option<u8>,
    pub value: f64,
    pub std_dev: Option<f64>,
}

impl FromSinexLine for SolutionEstimate {
    fn from_line(columns: &ColumnDecoder<'_>) -> Result<Self> {
        Ok(SolutionEstimate {
            index: columns.number("INDEX", 1..6)?,
            parameter: columns.required_text("TYPE", 7..13)?.to_string(),
            code: columns.text(14..18).to_uppercase(),
            point: columns.text(19..21).to_string(),
            solution: columns.text(22..26).to_string(),
            reference_epoch: columns.epoch("REF_EPOCH", 27..39)?,
            unit: columns.text(40..44).to_string(),
            constraint_code: columns.optional_number("CONSTRAINT", 45..46)?,
            value: columns.number("ESTIMATED_VALUE", 47..68)?,
            std_dev: columns.optional_number("STD_DEV", 69..80)?,
        })
    }
}

/// FILE/REFERENCE entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub info_type: String,
    pub value: String,
}

impl FromSinexLine for ReferenceEntry {
    fn from_line(columns: &ColumnDecoder<'_>) -> Result<Self> {
        Ok(ReferenceEntry {
            info_type: columns.required_text("INFO_TYPE", 1..19)?.to_string(),
            value: columns.raw(20..columns.line().len()).trim().to_string(),
        })
    }
}
