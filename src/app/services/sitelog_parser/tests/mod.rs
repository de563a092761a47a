//! Shared fixtures for site log decoder tests


use super::SitelogParser;
use crate::app::models::site::Site;
use crate::config::SitelogConfig;

/// Complete site log with three receivers, two antennas and template entries
pub const SAMPLE_LOG: &str = include_str!("../../../../../tests/fixtures/abmf00glp_20200101.log");

/// Format a `key : value` line with the colon in column 31
pub fn kv(label: &str, key: &str, value: &str) -> String {
    let head = if label.is_empty() {
        format!("     {}", key)
    } else {
        format!("{:<4} {}", label, key)
    };
    format!("{:<30}: {}", head, value).trim_end().to_string()
}

pub fn parse(text: &str) -> crate::Result<Site> {
    SitelogParser::new(SitelogConfig::default())
        .unwrap()
        .parse(text.as_bytes(), None)
}

pub fn parse_strict(text: &str) -> crate::Result<Site> {
    let config = SitelogConfig {
        strict_unknown_fields: true,
        ..SitelogConfig::default()
    };
    SitelogParser::new(config).unwrap().parse(text.as_bytes(), None)
}

/// Minimal log with identification and the given receiver/antenna lines
pub fn minimal_log(receiver_lines: &[String], antenna_lines: &[String]) -> String {
    let mut lines = vec![
        "1.   Site Identification of the GNSS Monument".to_string(),
        String::new(),
        kv("", "Site Name", "Test Site"),
        kv("", "Four Character ID", "TEST"),
        String::new(),
        "3.   GNSS Receiver Information".to_string(),
        String::new(),
    ];
    lines.extend(receiver_lines.iter().cloned());
    lines.push(String::new());
    lines.push("4.   GNSS Antenna Information".to_string());
    lines.push(String::new());
    lines.extend(antenna_lines.iter().cloned());
    lines.join("\n") + "\n"
}

pub fn receiver_entry(label: &str, receiver_type: &str, installed: &str, removed: &str) -> Vec<String> {
    vec![
        kv(label, "Receiver Type", receiver_type),
        kv("", "Satellite System", "GPS+GLO"),
        kv("", "Serial Number", "12345"),
        kv("", "Firmware Version", "1.0"),
        kv("", "Date Installed", installed),
        kv("", "Date Removed", removed),
        String::new(),
    ]
}

pub fn antenna_entry(label: &str, antenna_type: &str, installed: &str, removed: &str) -> Vec<String> {
    let radome = antenna_type.get(16..).map(str::trim).unwrap_or("NONE");
    vec![
        kv(label, "Antenna Type", antenna_type),
        kv("", "Serial Number", "98765"),
        kv("", "Marker->ARP Up Ecc. (m)", "0.0500"),
        kv("", "Marker->ARP North Ecc(m)", "0.0000"),
        kv("", "Marker->ARP East Ecc(m)", "0.0000"),
        kv("", "Antenna Radome Type", radome),
        kv("", "Date Installed", installed),
        kv("", "Date Removed", removed),
        String::new(),
    ]
}
