//! Data models for station metadata processing
//!
//! This module contains the core data structures shared by both decoders and the
//! history services: device time ranges, receivers, antennas, warnings and the
//! reconciled station-info intervals.

use crate::config::ReconcileConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub mod site;

// =============================================================================
// Time Ranges
// =============================================================================

/// Installation period of a device or validity period of a log entry
///
/// An unset `removed` date means the device is still in service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub installed: Option<DateTime<Utc>>,
    pub removed: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(installed: Option<DateTime<Utc>>, removed: Option<DateTime<Utc>>) -> Self {
        Self { installed, removed }
    }

    /// Whether the range has no end date
    pub fn is_open(&self) -> bool {
        self.removed.is_none()
    }

    /// Whether neither boundary is set
    pub fn is_empty(&self) -> bool {
        self.installed.is_none() && self.removed.is_none()
    }

    /// Check whether an instant falls inside the range (inclusive start, open end inclusive)
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let after_start = self.installed.is_none_or(|start| at >= start);
        let before_end = self.removed.is_none_or(|end| at <= end);
        after_start && before_end
    }

    /// Compare two removal dates where an open date sorts last
    pub fn cmp_removed(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

// =============================================================================
// Devices
// =============================================================================

/// Common behaviour of logged equipment
pub trait Device {
    /// Human-readable name of the equipment category
    const KIND: &'static str;

    fn time_range(&self) -> &TimeRange;

    fn time_range_mut(&mut self) -> &mut TimeRange;

    /// Type designator, e.g. `LEICA GR50`
    fn designator(&self) -> &str;

    /// Whether swapping `self` for `other` leaves the station configuration unchanged
    fn is_equivalent(&self, other: &Self, config: &ReconcileConfig) -> bool;
}

/// GNSS receiver entry (site log block 3, SINEX SITE/RECEIVER)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    /// Receiver type from the IGS rcvr_ant.tab, e.g. "SEPT POLARX5"
    pub receiver_type: String,

    /// Tracked satellite systems, normalized short identifiers
    pub satellite_systems: Vec<String>,

    pub serial_number: String,

    pub firmware: String,

    /// Elevation cutoff setting in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_cutoff: Option<f64>,

    pub temperature_stabilization: String,

    pub time_range: TimeRange,

    pub notes: String,
}

impl Device for Receiver {
    const KIND: &'static str = "receiver";

    fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    fn time_range_mut(&mut self) -> &mut TimeRange {
        &mut self.time_range
    }

    fn designator(&self) -> &str {
        &self.receiver_type
    }

    fn is_equivalent(&self, other: &Self, config: &ReconcileConfig) -> bool {
        self.receiver_type == other.receiver_type
            && self.serial_number == other.serial_number
            && (config.ignore_receiver_firmware || self.firmware == other.firmware)
    }
}

/// GNSS antenna entry (site log block 4, SINEX SITE/ANTENNA)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Antenna {
    /// Antenna model without radome, e.g. "TRM57971.00"
    pub antenna_type: String,

    pub serial_number: String,

    /// Antenna reference point, e.g. "BPA"
    pub reference_point: String,

    /// Marker to ARP eccentricities in metres
    pub marker_arp_up: f64,
    pub marker_arp_north: f64,
    pub marker_arp_east: f64,

    /// Alignment from true north in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_from_true_north: Option<f64>,

    /// Four character radome code, "NONE" when uncovered
    pub radome: String,

    pub radome_serial_number: String,

    pub cable_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cable_length: Option<f64>,

    pub time_range: TimeRange,

    pub notes: String,
}

impl Antenna {
    /// The A20 type designator with the radome in columns 17-20
    pub fn type_with_radome(&self) -> String {
        let radome = if self.radome.is_empty() {
            crate::constants::sitelog::NO_RADOME
        } else {
            &self.radome
        };
        format!("{:<16}{:>4}", self.antenna_type, radome)
    }
}

impl Device for Antenna {
    const KIND: &'static str = "antenna";

    fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    fn time_range_mut(&mut self) -> &mut TimeRange {
        &mut self.time_range
    }

    fn designator(&self) -> &str {
        &self.antenna_type
    }

    fn is_equivalent(&self, other: &Self, _config: &ReconcileConfig) -> bool {
        self.antenna_type == other.antenna_type
            && self.radome == other.radome
            && self.serial_number == other.serial_number
            && self.marker_arp_up == other.marker_arp_up
            && self.marker_arp_north == other.marker_arp_north
            && self.marker_arp_east == other.marker_arp_east
    }
}

// =============================================================================
// Warnings
// =============================================================================

/// Non-fatal issue found while decoding or cleaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// 1-based source line, if the issue stems from one
    pub line: Option<usize>,

    /// Field or item the warning refers to
    pub field: String,

    pub message: String,
}

impl Warning {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line: None,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn at_line(line: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}: {}", line, self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

// =============================================================================
// Observation Technique
// =============================================================================

/// Space geodetic technique code used by SINEX
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationTechnique {
    Combined,
    Doris,
    Slr,
    Llr,
    Gnss,
    Vlbi,
}

impl ObservationTechnique {
    /// Decode the single character technique code
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'C' => Some(Self::Combined),
            'D' => Some(Self::Doris),
            'L' => Some(Self::Slr),
            'M' => Some(Self::Llr),
            'P' => Some(Self::Gnss),
            'R' => Some(Self::Vlbi),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Self::Combined => 'C',
            Self::Doris => 'D',
            Self::Slr => 'L',
            Self::Llr => 'M',
            Self::Gnss => 'P',
            Self::Vlbi => 'R',
        }
    }
}

impl fmt::Display for ObservationTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// =============================================================================
// Station Intervals
// =============================================================================

/// A span during which one receiver and one antenna were operated together
///
/// Intervals borrow the devices of the site they were derived from and are
/// recomputed on every reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct StationInterval<'a> {
    /// Four character station code
    pub site_code: &'a str,

    /// Station name or description
    pub station_name: &'a str,

    pub domes_number: &'a str,

    pub from: DateTime<Utc>,

    /// End of the span, unset while the pair is still in service
    pub to: Option<DateTime<Utc>>,

    pub receiver: &'a Receiver,

    pub antenna: &'a Antenna,

    /// Always GNSS for station-info intervals
    pub technique: ObservationTechnique,
}

impl StationInterval<'_> {
    pub fn is_open(&self) -> bool {
        self.to.is_none()
    }
}
