//! Fixed-column field extraction for SINEX lines
//!
//! This module provides the `ColumnDecoder` used by every SINEX record type:
//! byte-offset slicing with trimming, plus typed parsers for epochs, numbers and
//! angles that report failures as located format errors.

use crate::constants::sinex::{YEAR_PIVOT, ZERO_EPOCH};
use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::ops::Range;
use std::str::FromStr;

/// Column accessor over a single line
#[derive(Debug, Clone, Copy)]
pub struct ColumnDecoder<'a> {
    line: &'a str,
    line_number: usize,
}

impl<'a> ColumnDecoder<'a> {
    pub fn new(line: &'a str, line_number: usize) -> Self {
        Self { line, line_number }
    }

    pub fn line(&self) -> &'a str {
        self.line
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Raw slice of a column, clamped to the line length
    pub fn raw(&self, range: Range<usize>) -> &'a str {
        slice_columns(self.line, range)
    }

    /// Trimmed column text; dash-only fillers are returned as empty
    pub fn text(&self, range: Range<usize>) -> &'a str {
        clean_column(self.raw(range))
    }

    /// Trimmed column text that must not be empty
    pub fn required_text(&self, field: &str, range: Range<usize>) -> Result<&'a str> {
        let value = self.text(range.clone());
        if value.is_empty() {
            return Err(self.error(field, range, "empty value"));
        }
        Ok(value)
    }

    /// Single character at a byte offset, `None` for blanks
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.line
            .get(index..)
            .and_then(|rest| rest.chars().next())
            .filter(|c| !c.is_whitespace())
    }

    /// Parse a `YY:DDD:SSSSS` epoch; the zero epoch decodes to `None`
    pub fn epoch(&self, field: &str, range: Range<usize>) -> Result<Option<DateTime<Utc>>> {
        let raw = self.text(range.clone());
        parse_epoch(raw).map_err(|cause| self.error(field, range, cause))
    }

    /// Parse a required number
    pub fn number<T>(&self, field: &str, range: Range<usize>) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.required_text(field, range.clone())?;
        raw.parse::<T>()
            .map_err(|e| self.error(field, range, format!("invalid number: {}", e)))
    }

    /// Parse an optional number; blank columns give `None`
    pub fn optional_number<T>(&self, field: &str, range: Range<usize>) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        if self.text(range.clone()).is_empty() {
            return Ok(None);
        }
        self.number(field, range).map(Some)
    }

    /// Parse a `DDD MM SS.S` angle into decimal degrees
    pub fn angle(&self, field: &str, range: Range<usize>) -> Result<Option<f64>> {
        let raw = self.text(range.clone());
        if raw.is_empty() {
            return Ok(None);
        }
        parse_dms(raw)
            .map(Some)
            .map_err(|cause| self.error(field, range, cause))
    }

    fn error(&self, field: &str, range: Range<usize>, cause: impl Into<String>) -> Error {
        Error::format(
            self.line_number,
            field,
            self.raw(range).trim(),
            cause.into(),
        )
    }
}

/// Slice a line by byte offsets without splitting a character
pub fn slice_columns(line: &str, range: Range<usize>) -> &str {
    let mut start = range.start.min(line.len());
    let mut end = range.end.min(line.len());
    while !line.is_char_boundary(start) {
        start -= 1;
    }
    while !line.is_char_boundary(end) {
        end += 1;
    }
    &line[start..end.max(start)]
}

/// Trim a column and blank out dash-only fillers such as `-----`
pub fn clean_column(value: &str) -> &str {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c == '-') {
        ""
    } else {
        trimmed
    }
}

/// Parse a SINEX epoch `YY:DDD:SSSSS` (or `YYYY:DDD:SSSSS`)
///
/// Two-digit years above 50 belong to the 1900s. The all-zero epoch means
/// "unset" and yields `Ok(None)`.
pub fn parse_epoch(value: &str) -> std::result::Result<Option<DateTime<Utc>>, String> {
    let value = value.trim();
    if value == ZERO_EPOCH || value == "0000:000:00000" {
        return Ok(None);
    }

    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("expected YY:DDD:SSSSS, got '{}'", value));
    }

    let year_raw = parts[0].trim();
    let year: i32 = year_raw
        .parse()
        .map_err(|_| format!("invalid year '{}'", year_raw))?;
    let day: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("invalid day of year '{}'", parts[1]))?;
    let seconds: i64 = parts[2]
        .trim()
        .parse()
        .map_err(|_| format!("invalid seconds of day '{}'", parts[2]))?;

    if year == 0 && day == 0 && seconds == 0 && year_raw.len() == 2 {
        return Ok(None);
    }

    let year = match year_raw.len() {
        2 if year > YEAR_PIVOT => 1900 + year,
        2 => 2000 + year,
        4 => year,
        _ => return Err(format!("invalid year '{}'", year_raw)),
    };

    if !(0..=86_400).contains(&seconds) {
        return Err(format!("seconds of day out of range: {}", seconds));
    }

    let date = NaiveDate::from_yo_opt(year, day)
        .ok_or_else(|| format!("invalid day of year {} in {}", day, year))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid date {}", date))?
        .and_utc();

    Ok(Some(midnight + Duration::seconds(seconds)))
}

/// Parse `DDD MM SS.S` into decimal degrees; the sign of the degrees applies to all parts
pub fn parse_dms(value: &str) -> std::result::Result<f64, String> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(format!("expected 'DDD MM SS.S', got '{}'", value));
    }

    let degrees: f64 = parts[0]
        .parse()
        .map_err(|_| format!("invalid degrees '{}'", parts[0]))?;
    let minutes: f64 = parts[1]
        .parse()
        .map_err(|_| format!("invalid minutes '{}'", parts[1]))?;
    let seconds: f64 = parts[2]
        .parse()
        .map_err(|_| format!("invalid seconds '{}'", parts[2]))?;

    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    if parts[0].starts_with('-') {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}
