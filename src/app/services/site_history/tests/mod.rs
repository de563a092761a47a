//! Shared fixtures for history cleaning and reconciliation tests

pub mod cleaner_tests;

use crate::app::models::site::Site;
use crate::app::models::{Antenna, Receiver, TimeRange};
use chrono::{DateTime, TimeZone, Utc};

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    at(year, month, day, 0, 0)
}

pub fn receiver(
    receiver_type: &str,
    firmware: &str,
    installed: Option<DateTime<Utc>>,
    removed: Option<DateTime<Utc>>,
) -> Receiver {
    Receiver {
        receiver_type: receiver_type.to_string(),
        serial_number: format!("{}-SN", receiver_type),
        firmware: firmware.to_string(),
        satellite_systems: vec!["GPS".to_string()],
        time_range: TimeRange::new(installed, removed),
        ..Receiver::default()
    }
}

pub fn antenna(
    antenna_type: &str,
    installed: Option<DateTime<Utc>>,
    removed: Option<DateTime<Utc>>,
) -> Antenna {
    Antenna {
        antenna_type: antenna_type.to_string(),
        radome: "NONE".to_string(),
        serial_number: format!("{}-SN", antenna_type),
        marker_arp_up: 0.05,
        time_range: TimeRange::new(installed, removed),
        ..Antenna::default()
    }
}

pub fn site(receivers: Vec<Receiver>, antennas: Vec<Antenna>) -> Site {
    let mut site = Site::with_code("TEST");
    site.receivers = receivers;
    site.antennas = antennas;
    site
}
