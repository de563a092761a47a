//! SINEX header line and FILE/REFERENCE block
//!
//! The header is the first line of every SINEX file. It is decoded by fixed
//! columns before any block is read; a malformed header aborts decoding.

use super::field_parsers::ColumnDecoder;
use crate::app::models::ObservationTechnique;
use crate::constants::sinex::{DOCUMENT_TYPE, HEADER_PREFIX};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Solution type characters allowed in the header
const SOLUTION_TYPES: &[char] = &['S', 'O', 'E', 'T', 'C', 'A', 'X'];

/// Decoded `%=SNX` header line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Format version, e.g. "2.02"
    pub version: String,

    /// Agency creating the file
    pub agency: String,

    pub creation_time: Option<DateTime<Utc>>,

    /// Agency providing the data
    pub data_agency: String,

    /// Time span covered by the data
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,

    pub technique: ObservationTechnique,

    /// Number of estimated parameters declared for SOLUTION/ESTIMATE
    pub num_estimates: usize,

    /// 0 fixed/tight, 1 significant, 2 unconstrained
    pub constraint_code: u8,

    /// Solution types contained in the file, e.g. ["S", "E"]
    pub solution_types: Vec<String>,
}

impl Header {
    /// Parse the header line
    pub fn parse(line: &str, line_number: usize) -> Result<Self> {
        let columns = ColumnDecoder::new(line, line_number);

        if columns.raw(0..2) != HEADER_PREFIX {
            return Err(Error::format(
                line_number,
                "HEADER",
                columns.raw(0..5),
                "header line must start with '%='",
            ));
        }
        let document_type = columns.text(2..5);
        if document_type != DOCUMENT_TYPE {
            return Err(Error::format(
                line_number,
                "DOCUMENT_TYPE",
                document_type,
                format!("expected document type {}", DOCUMENT_TYPE),
            ));
        }

        let version = columns.required_text("VERSION", 6..10)?.to_string();
        let agency = columns.required_text("AGENCY", 11..14)?.to_string();
        let creation_time = columns.epoch("CREATION_TIME", 15..27)?;
        let data_agency = columns.required_text("DATA_AGENCY", 28..31)?.to_string();
        let start_time = columns.epoch("START_TIME", 32..44)?;
        let end_time = columns.epoch("END_TIME", 45..57)?;

        let technique_code = columns.required_text("TECHNIQUE", 58..59)?;
        let technique = technique_code
            .chars()
            .next()
            .and_then(ObservationTechnique::from_code)
            .ok_or_else(|| {
                Error::format(
                    line_number,
                    "TECHNIQUE",
                    technique_code,
                    "unknown observation technique",
                )
            })?;

        let num_estimates: usize = columns.number("NUM_ESTIMATES", 60..65)?;
        let constraint_code: u8 = columns.number("CONSTRAINT_CODE", 66..67)?;
        if constraint_code > 2 {
            return Err(Error::format(
                line_number,
                "CONSTRAINT_CODE",
                constraint_code.to_string(),
                "constraint code must be 0, 1 or 2",
            ));
        }

        let mut solution_types = Vec::new();
        for token in columns.raw(68..line.len()).split_whitespace() {
            let valid = token.len() == 1 && token.chars().all(|c| SOLUTION_TYPES.contains(&c));
            if !valid {
                return Err(Error::format(
                    line_number,
                    "SOLUTION_TYPES",
                    token,
                    "unknown solution type",
                ));
            }
            solution_types.push(token.to_string());
        }

        if let (Some(start), Some(end)) = (start_time, end_time) {
            if start > end {
                return Err(Error::format(
                    line_number,
                    "END_TIME",
                    columns.text(45..57),
                    "end of data precedes its start",
                ));
            }
        }

        Ok(Header {
            version,
            agency,
            creation_time,
            data_agency,
            start_time,
            end_time,
            technique,
            num_estimates,
            constraint_code,
            solution_types,
        })
    }

    /// Whether an epoch lies inside the declared data span
    pub fn covers(&self, epoch: DateTime<Utc>) -> bool {
        let after_start = self.start_time.is_none_or(|start| epoch >= start);
        let before_end = self.end_time.is_none_or(|end| epoch <= end);
        after_start && before_end
    }
}

/// Contents of the mandatory FILE/REFERENCE block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileReference {
    pub description: String,
    pub output: String,
    pub contact: String,
    pub software: String,
    pub hardware: String,
    pub input: String,
    /// Info types not covered above, in file order
    pub other: Vec<(String, String)>,
}

impl FileReference {
    /// Store one `INFO_TYPE INFO` entry
    pub fn insert(&mut self, info_type: &str, value: &str) {
        let slot = match info_type {
            "DESCRIPTION" => &mut self.description,
            "OUTPUT" => &mut self.output,
            "CONTACT" => &mut self.contact,
            "SOFTWARE" => &mut self.software,
            "HARDWARE" => &mut self.hardware,
            "INPUT" => &mut self.input,
            _ => {
                self.other.push((info_type.to_string(), value.to_string()));
                return;
            }
        };
        if slot.is_empty() {
            *slot = value.to_string();
        } else {
            slot.push('\n');
            slot.push_str(value);
        }
    }
}
