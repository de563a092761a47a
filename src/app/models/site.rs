//! Site aggregate and the descriptive site log entries
//!
//! A `Site` owns the receiver and antenna histories together with the
//! descriptive metadata of an IGS site log. Only the history cleaner mutates
//! the device lists after decoding.

use super::{Antenna, Receiver, TimeRange, Warning};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Block 0: the form itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormInfo {
    pub prepared_by: String,
    pub date_prepared: Option<DateTime<Utc>>,
    pub report_type: String,
    pub previous_site_log: String,
    pub modified_sections: String,
}

/// Block 1: site identification of the GNSS monument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub site_name: String,
    pub four_character_id: String,
    pub nine_character_id: String,
    pub monument_inscription: String,
    pub domes_number: String,
    pub cdp_number: String,
    pub monument_description: String,
    pub monument_height: Option<f64>,
    pub monument_foundation: String,
    pub foundation_depth: Option<f64>,
    pub marker_description: String,
    pub date_installed: Option<DateTime<Utc>>,
    pub geologic_characteristic: String,
    pub bedrock_type: String,
    pub bedrock_condition: String,
    pub fracture_spacing: String,
    pub fault_zones_nearby: String,
    pub distance_activity: String,
    pub notes: String,
}

/// Block 2: site location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
    pub tectonic_plate: String,
    /// Approximate ITRF position in metres
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    /// Decimal degrees, north positive
    pub latitude: Option<f64>,
    /// Decimal degrees, east positive
    pub longitude: Option<f64>,
    /// Ellipsoidal height in metres
    pub elevation: Option<f64>,
    pub notes: String,
}

/// Block 5: surveyed local tie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalTie {
    pub marker_name: String,
    pub marker_usage: String,
    pub cdp_number: String,
    pub domes_number: String,
    pub dx: Option<f64>,
    pub dy: Option<f64>,
    pub dz: Option<f64>,
    pub accuracy_mm: Option<f64>,
    pub survey_method: String,
    pub date_measured: Option<DateTime<Utc>>,
    pub notes: String,
}

/// Block 6: frequency standard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyStandard {
    pub standard_type: String,
    pub input_frequency: String,
    pub effective_dates: TimeRange,
    pub notes: String,
}

/// Block 7: collocated instrumentation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collocation {
    pub instrumentation_type: String,
    pub status: String,
    pub effective_dates: TimeRange,
    pub notes: String,
}

/// Kinds of meteorological sensor in block 8
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetSensorKind {
    #[default]
    Humidity,
    Pressure,
    Temperature,
    WaterVaporRadiometer,
}

/// Blocks 8.1-8.4: meteorological sensor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetSensor {
    pub kind: MetSensorKind,
    pub model: String,
    pub manufacturer: String,
    pub serial_number: String,
    /// Seconds between samples
    pub data_sampling_interval: Option<f64>,
    pub accuracy: String,
    pub aspiration: String,
    pub height_diff_to_antenna: Option<f64>,
    pub distance_to_antenna: Option<f64>,
    pub calibration_date: Option<DateTime<Utc>>,
    pub effective_dates: TimeRange,
    pub notes: String,
}

/// Block 10: local episodic effect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodicEvent {
    pub dates: TimeRange,
    pub event: String,
}

/// Contact person of an agency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub telephone_primary: String,
    pub telephone_secondary: String,
    pub fax: String,
    pub email: String,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.telephone_primary.is_empty()
    }
}

/// Blocks 11 and 12: point of contact and responsible agency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub agency: String,
    pub preferred_abbreviation: String,
    pub mailing_address: String,
    pub primary_contact: Contact,
    pub secondary_contact: Contact,
    pub notes: String,
}

/// Block 13: more information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoreInformation {
    pub primary_data_center: String,
    pub secondary_data_center: String,
    pub url: String,
    pub site_map: String,
    pub site_diagram: String,
    pub horizon_mask: String,
    pub monument_description: String,
    pub site_pictures: String,
    pub notes: String,
    pub antenna_graphics: String,
}

/// A GNSS station with its equipment history and descriptive metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub form: FormInfo,
    pub identification: Identification,
    pub location: Location,
    pub receivers: Vec<Receiver>,
    pub antennas: Vec<Antenna>,
    pub local_ties: Vec<LocalTie>,
    pub frequency_standards: Vec<FrequencyStandard>,
    pub collocations: Vec<Collocation>,
    pub humidity_sensors: Vec<MetSensor>,
    pub pressure_sensors: Vec<MetSensor>,
    pub temperature_sensors: Vec<MetSensor>,
    pub water_vapor_radiometers: Vec<MetSensor>,
    pub other_instrumentation: String,
    pub episodic_events: Vec<EpisodicEvent>,
    pub contact_agency: Agency,
    pub responsible_agency: Agency,
    pub more_information: MoreInformation,
    /// Non-fatal issues accumulated during decoding and cleaning
    pub warnings: Vec<Warning>,
}

impl Site {
    /// Create an empty site for a station code
    pub fn with_code(code: impl Into<String>) -> Self {
        let mut site = Self::default();
        site.identification.four_character_id = code.into();
        site
    }

    /// Four character station code, derived from the nine character ID if needed
    pub fn site_code(&self) -> &str {
        let four = self.identification.four_character_id.as_str();
        if !four.is_empty() {
            return four;
        }
        let nine = self.identification.nine_character_id.as_str();
        nine.get(..4).unwrap_or(nine)
    }

    pub fn station_name(&self) -> &str {
        &self.identification.site_name
    }

    pub fn domes_number(&self) -> &str {
        &self.identification.domes_number
    }

    /// Merge warnings returned by a decode or clean step
    pub fn add_warnings(&mut self, warnings: impl IntoIterator<Item = Warning>) {
        self.warnings.extend(warnings);
    }

    /// Met sensor list for a sensor kind
    pub fn met_sensors_mut(&mut self, kind: MetSensorKind) -> &mut Vec<MetSensor> {
        match kind {
            MetSensorKind::Humidity => &mut self.humidity_sensors,
            MetSensorKind::Pressure => &mut self.pressure_sensors,
            MetSensorKind::Temperature => &mut self.temperature_sensors,
            MetSensorKind::WaterVaporRadiometer => &mut self.water_vapor_radiometers,
        }
    }
}
