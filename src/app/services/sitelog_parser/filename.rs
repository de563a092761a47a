//! Station identification from site log file names

use super::field_parsers::compile;
use crate::Result;
use crate::constants::sitelog::FILENAME_PATTERN;
use regex::Regex;
use std::path::Path;

/// Identifier recovered from a file name such as `abmf00glp_20200101.log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationId {
    pub four_character_id: String,
    pub nine_character_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FilenamePattern {
    pattern: Regex,
}

impl FilenamePattern {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: compile(FILENAME_PATTERN)?,
        })
    }

    /// Identify the station from the final component of a path
    pub fn identify(&self, path: &str) -> Option<StationId> {
        let file_name = Path::new(path).file_name()?.to_str()?;
        let captures = self.pattern.captures(file_name)?;
        let four = captures.get(1)?.as_str().to_uppercase();
        let nine = captures
            .get(2)
            .map(|suffix| format!("{}{}", four, suffix.as_str().to_uppercase()));

        Some(StationId {
            four_character_id: four,
            nine_character_id: nine,
        })
    }
}
