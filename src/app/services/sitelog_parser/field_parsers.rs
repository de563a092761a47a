//! Value parsers for site log fields
//!
//! Site log values are free-form text typed by station operators. These helpers
//! turn them into typed values and report failures as plain messages; the
//! caller decides whether a failure is fatal or only a warning.

use crate::app::models::TimeRange;
use crate::constants::sitelog::{ANTENNA_MODEL_WIDTH, DATE_FORMATS, DATE_TEMPLATE};
use crate::constants::{SATELLITE_SYSTEM_ALIASES, SATELLITE_SYSTEMS};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

/// Compile a built-in pattern
pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| Error::configuration(format!("invalid pattern '{}': {}", pattern, e)))
}

/// Patterns needed to read numeric values
#[derive(Debug, Clone)]
pub struct ValuePatterns {
    leading_number: Regex,
}

impl ValuePatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            leading_number: compile(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")?,
        })
    }

    /// Read the number at the start of a value, ignoring trailing units
    ///
    /// `"0.0710 m"` gives 0.071, `"10 deg"` gives 10.
    pub fn number(&self, value: &str) -> std::result::Result<f64, String> {
        let value = value.trim();
        let matched = self
            .leading_number
            .find(value)
            .ok_or_else(|| format!("no number in '{}'", value))?;
        matched
            .as_str()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{}': {}", matched.as_str(), e))
    }
}

/// Whether a value is a template placeholder such as `(A4)` or `(m)`
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.len() >= 2 && value.starts_with('(') && value.ends_with(')')
}

/// Trim a value and blank out placeholders
pub fn clean_value(value: &str) -> &str {
    let value = value.trim();
    if is_placeholder(value) { "" } else { value }
}

/// Parse a site log date
///
/// Empty values and the unfilled `CCYY-MM-DDThh:mmZ` template give `None`.
pub fn parse_date(value: &str) -> std::result::Result<Option<DateTime<Utc>>, String> {
    let value = clean_value(value);
    if value.is_empty() || is_date_template(value) {
        return Ok(None);
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Some(parsed.and_utc()));
        }
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("unrecognized date '{}'", value))?;
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| format!("invalid date '{}'", value))
}

/// Template fragments such as `CCYY-MM-DD` or `CCYY-MM-DDThh:mmZ`
fn is_date_template(value: &str) -> bool {
    value.eq_ignore_ascii_case(DATE_TEMPLATE) || value.to_ascii_uppercase().starts_with("CCYY")
}

/// Parse an `A/B` effective date range; either side may be missing
pub fn parse_effective_dates(value: &str) -> std::result::Result<TimeRange, String> {
    let value = clean_value(value);
    let (start, end) = match value.split_once('/') {
        Some((start, end)) => (start, end),
        None => (value, ""),
    };
    let installed = parse_date(start)?;
    let removed = parse_date(end)?;

    if let (Some(installed), Some(removed)) = (installed, removed) {
        if installed > removed {
            return Err(format!("range '{}' ends before it starts", value));
        }
    }
    Ok(TimeRange::new(installed, removed))
}

/// Parse `GPS+GLO+GAL` into normalized system identifiers
pub fn parse_satellite_systems(value: &str) -> std::result::Result<Vec<String>, String> {
    let mut systems = Vec::new();
    for token in clean_value(value).split('+') {
        let token = token.trim().to_uppercase();
        if token.is_empty() {
            continue;
        }
        let system = SATELLITE_SYSTEM_ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|(_, short)| short.to_string())
            .unwrap_or(token);

        if !SATELLITE_SYSTEMS.contains(&system.as_str()) {
            return Err(format!("unknown satellite system '{}'", system));
        }
        if !systems.contains(&system) {
            systems.push(system);
        }
    }
    Ok(systems)
}

/// Parse a compact `+DDMMSS.SS` / `-DDDMMSS.SS` angle into decimal degrees
pub fn parse_compact_angle(value: &str) -> std::result::Result<f64, String> {
    let value = clean_value(value);
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.len() < 5 || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("expected [+-]DDMMSS.SS, got '{}'", value));
    }

    let split = whole.len() - 4;
    let degrees: f64 = whole[..split]
        .parse()
        .map_err(|_| format!("invalid degrees in '{}'", value))?;
    let minutes: f64 = whole[split..split + 2]
        .parse()
        .map_err(|_| format!("invalid minutes in '{}'", value))?;
    let seconds: f64 = format!("{}.{}", &whole[split + 2..], fraction)
        .trim_end_matches('.')
        .parse()
        .map_err(|_| format!("invalid seconds in '{}'", value))?;

    if minutes >= 60.0 || seconds >= 60.0 {
        return Err(format!("minutes or seconds out of range in '{}'", value));
    }

    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Split an A20 antenna type into the model and the radome carried in columns 17-20
pub fn split_antenna_type(value: &str) -> (&str, Option<&str>) {
    let value = value.trim();
    match value.get(ANTENNA_MODEL_WIDTH..) {
        Some(radome) if !radome.trim().is_empty() => {
            (value[..ANTENNA_MODEL_WIDTH].trim_end(), Some(radome.trim()))
        }
        _ => match value.rsplit_once(char::is_whitespace) {
            // Shorter values may still separate the radome by blanks
            Some((model, radome)) if radome.len() == 4 && !model.trim().is_empty() => {
                (model.trim_end(), Some(radome))
            }
            _ => (value, None),
        },
    }
}

/// Normalize a key for matching: lower-case letters and digits only
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
