//! Streaming block reader for SINEX files
//!
//! The reader walks a line source strictly forward. `advance_block` moves to the
//! next `+NAME` marker and `advance_record` moves to the next data line inside
//! the current block; the caller decides which record type to decode.

use super::field_parsers::ColumnDecoder;
use super::header::{FileReference, Header};
use super::records::{FromSinexLine, ReferenceEntry};
use crate::constants::sinex::{
    BLOCK_BEGIN, BLOCK_END, COMMENT, DATA, MANDATORY_FIRST_BLOCK, TRAILER,
};
use crate::{Error, Result};
use std::io::BufRead;
use tracing::{debug, warn};

/// Block-structured SINEX decoder over any buffered reader
#[derive(Debug)]
pub struct SinexReader<R> {
    input: R,
    header: Header,
    file_reference: FileReference,
    current_block: String,
    current_line: String,
    line_number: usize,
    /// Set when `advance_record` stopped on a begin marker it did not consume
    pending_begin: bool,
}

impl<R: BufRead> SinexReader<R> {
    /// Decode the header line and the mandatory FILE/REFERENCE block
    pub fn new(mut input: R) -> Result<Self> {
        let mut first_line = String::new();
        let read = input
            .read_line(&mut first_line)
            .map_err(|e| Error::io("Failed to read SINEX header", e))?;
        if read == 0 {
            return Err(Error::format(1, "HEADER", "", "empty input"));
        }
        let first_line = first_line.trim_end_matches(['\n', '\r']).to_string();
        let header = Header::parse(&first_line, 1)?;
        debug!(
            "SINEX {} from {} with {} estimates",
            header.version, header.agency, header.num_estimates
        );

        let mut reader = SinexReader {
            input,
            header,
            file_reference: FileReference::default(),
            current_block: String::new(),
            current_line: first_line,
            line_number: 1,
            pending_begin: false,
        };

        if !reader.advance_block()? || reader.current_block != MANDATORY_FIRST_BLOCK {
            return Err(Error::mandatory_block_not_found(MANDATORY_FIRST_BLOCK));
        }

        let mut file_reference = FileReference::default();
        while reader.advance_record()? {
            let entry: ReferenceEntry = reader.decode()?;
            file_reference.insert(&entry.info_type, &entry.value);
        }
        reader.file_reference = file_reference;

        Ok(reader)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn file_reference(&self) -> &FileReference {
        &self.file_reference
    }

    /// Name of the block the reader is in, e.g. "SITE/RECEIVER"
    pub fn current_block(&self) -> &str {
        &self.current_block
    }

    pub fn current_line(&self) -> &str {
        &self.current_line
    }

    /// 1-based number of the current line
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Move to the next block begin marker; `false` at end of input
    pub fn advance_block(&mut self) -> Result<bool> {
        if self.pending_begin {
            self.pending_begin = false;
            self.enter_block();
            return Ok(true);
        }

        while self.next_line()? {
            if self.current_line.starts_with(BLOCK_BEGIN) {
                self.enter_block();
                return Ok(true);
            }
            if self.current_line.starts_with(TRAILER) {
                debug!("SINEX trailer at line {}", self.line_number);
                return Ok(false);
            }
        }
        Ok(false)
    }

    /// Move to the next data line of the current block
    ///
    /// Comments and blank lines are skipped. Returns `false` on the end marker,
    /// on any other reserved line and at end of input.
    pub fn advance_record(&mut self) -> Result<bool> {
        while self.next_line()? {
            if self.current_line.trim().is_empty() {
                continue;
            }
            match self.current_line.chars().next() {
                Some(COMMENT) => continue,
                Some(DATA) => return Ok(true),
                Some(BLOCK_END) => return Ok(false),
                Some(BLOCK_BEGIN) => {
                    warn!(
                        "Block {} not terminated before line {}",
                        self.current_block, self.line_number
                    );
                    self.pending_begin = true;
                    return Ok(false);
                }
                _ => {
                    debug!(
                        "Line {} ends block {}: not a data line",
                        self.line_number, self.current_block
                    );
                    return Ok(false);
                }
            }
        }
        Ok(false)
    }

    /// Decode the current data line as a record
    pub fn decode<T: FromSinexLine>(&self) -> Result<T> {
        self.decode_with(T::from_line)
    }

    /// Decode the current data line with a custom column decoder
    pub fn decode_with<T>(&self, decoder: impl FnOnce(&ColumnDecoder<'_>) -> Result<T>) -> Result<T> {
        decoder(&ColumnDecoder::new(&self.current_line, self.line_number))
    }

    fn enter_block(&mut self) {
        self.current_block = self.current_line[1..].trim().to_string();
        debug!(
            "Entering block {} at line {}",
            self.current_block, self.line_number
        );
    }

    fn next_line(&mut self) -> Result<bool> {
        self.current_line.clear();
        let read = self.input.read_line(&mut self.current_line).map_err(|e| {
            Error::io(
                format!("Failed to read SINEX line {}", self.line_number + 1),
                e,
            )
        })?;
        if read == 0 {
            return Ok(false);
        }

        self.line_number += 1;
        let trimmed_len = self.current_line.trim_end_matches(['\n', '\r']).len();
        self.current_line.truncate(trimmed_len);
        Ok(true)
    }
}
