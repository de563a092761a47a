//! Single-pass site log decoder
//!
//! The parser walks the log line by line. Block headings and sub-block labels
//! move the `BlockState`; blank lines, new sub-blocks, new blocks and the end
//! of input commit the entry being filled. Every step returns its own
//! warnings, which are merged into the `Site` once decoding finishes.

use super::blocks::{BlockState, Field, FieldOutcome, is_free_text};
use super::field_parsers::{ValuePatterns, clean_value, is_placeholder};
use super::filename::FilenamePattern;
use super::line::{LineClassifier, LineKind, is_placeholder_label, label_block};
use crate::app::models::Warning;
use crate::app::models::site::Site;
use crate::config::SitelogConfig;
use crate::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// IGS site log decoder
#[derive(Debug, Clone)]
pub struct SitelogParser {
    config: SitelogConfig,
    classifier: LineClassifier,
    values: ValuePatterns,
    filenames: FilenamePattern,
}

/// Field that continuation lines append to
#[derive(Debug, Clone)]
struct ActiveField {
    name: String,
    key: String,
    known: bool,
}

/// Position of the parser within the log
#[derive(Debug, Default)]
struct Cursor {
    block: BlockState,
    block_number: Option<u8>,
    seen_labels: HashSet<String>,
    active: Option<ActiveField>,
}

impl Cursor {
    fn enter_block(&mut self, number: u8) {
        self.block = BlockState::for_block(number);
        self.block_number = Some(number);
        self.seen_labels.clear();
        self.active = None;
    }
}

impl SitelogParser {
    pub fn new(config: SitelogConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: LineClassifier::new(config.key_width)?,
            values: ValuePatterns::new()?,
            filenames: FilenamePattern::new()?,
            config,
        })
    }

    /// Decode a site log file; the file name serves as identifier fallback
    pub fn parse_file(&self, path: &Path) -> Result<Site> {
        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
        let file_name = path.file_name().and_then(|name| name.to_str());
        self.parse(BufReader::new(file), file_name)
    }

    /// Decode a site log from any buffered reader
    pub fn parse<R: BufRead>(&self, input: R, file_name: Option<&str>) -> Result<Site> {
        let mut site = Site::default();
        let mut cursor = Cursor::default();
        let mut warnings = Vec::new();

        for (index, line) in input.lines().enumerate() {
            let line_number = index + 1;
            let line = line
                .map_err(|e| Error::io(format!("Failed to read line {}", line_number), e))?;
            warnings.extend(self.step(&mut cursor, &mut site, &line, line_number)?);
        }
        warnings.extend(cursor.block.commit(&mut site));
        warnings.extend(self.identify(&mut site, file_name));

        info!(
            "Decoded site log {}: {} receivers, {} antennas, {} warnings",
            site.site_code(),
            site.receivers.len(),
            site.antennas.len(),
            warnings.len()
        );
        site.add_warnings(warnings);
        Ok(site)
    }

    fn step(
        &self,
        cursor: &mut Cursor,
        site: &mut Site,
        line: &str,
        line_number: usize,
    ) -> Result<Vec<Warning>> {
        let kind = self.classifier.classify(line);

        if cursor.block.is_graphics() && !matches!(kind, LineKind::Heading { .. }) {
            let graphics = &mut site.more_information.antenna_graphics;
            if !(graphics.is_empty() && line.trim().is_empty()) {
                if !graphics.is_empty() {
                    graphics.push('\n');
                }
                graphics.push_str(line.trim_end());
            }
            return Ok(Vec::new());
        }

        match kind {
            LineKind::Blank => {
                cursor.active = None;
                Ok(cursor.block.commit(site))
            }
            LineKind::Heading { number, title } => {
                let warnings = cursor.block.commit(site);
                debug!("Block {} '{}' at line {}", number, title, line_number);
                cursor.enter_block(number);
                Ok(warnings)
            }
            LineKind::Caption(caption) => {
                cursor.block.apply_caption(caption);
                cursor.active = None;
                Ok(Vec::new())
            }
            LineKind::Field {
                label,
                key,
                name,
                value,
            } => self.field(cursor, site, label, Field::new(line_number, key, &name, value)),
            LineKind::Continuation(value) => Ok(self.continuation(cursor, site, value, line_number)),
            LineKind::Text(text) => Ok(self.text(cursor, site, text, line_number)),
        }
    }

    fn field(
        &self,
        cursor: &mut Cursor,
        site: &mut Site,
        label: Option<&str>,
        field: Field<'_>,
    ) -> Result<Vec<Warning>> {
        let mut warnings = Vec::new();

        if let Some(label) = label {
            warnings.extend(cursor.block.commit(site));
            cursor.active = None;

            if is_placeholder_label(label) {
                debug!("Skipping template entry {} at line {}", label, field.line);
                cursor.block = BlockState::Ignore;
                return Ok(warnings);
            }

            if let Some(number) = label_block(label) {
                if cursor.block_number != Some(number) {
                    warnings.push(Warning::at_line(
                        field.line,
                        label,
                        format!("sub-block {} appears outside block {}", label, number),
                    ));
                    cursor.block_number = Some(number);
                    cursor.seen_labels.clear();
                }
            }
            if !cursor.seen_labels.insert(label.to_string()) {
                return Err(Error::duplicate_sub_block(field.line, label));
            }
            cursor.block = BlockState::for_sub_block(label);
        }

        if cursor.block.is_ignored() {
            return Ok(warnings);
        }

        let known = match cursor.block.apply_field(site, &field, &self.values)? {
            FieldOutcome::Stored => true,
            FieldOutcome::Warned(warning) => {
                warn!("{}", warning);
                warnings.push(warning);
                true
            }
            FieldOutcome::Unknown => {
                if self.config.strict_unknown_fields {
                    warnings.push(Warning::at_line(field.line, field.key, "unknown field"));
                } else {
                    debug!("Unknown field '{}' at line {}", field.key, field.line);
                }
                false
            }
        };

        cursor.active = Some(ActiveField {
            name: field.name.to_string(),
            key: field.key.to_string(),
            known,
        });
        Ok(warnings)
    }

    fn continuation(
        &self,
        cursor: &mut Cursor,
        site: &mut Site,
        value: &str,
        line_number: usize,
    ) -> Vec<Warning> {
        let value = clean_value(value);
        if value.is_empty() || cursor.block.is_ignored() {
            return Vec::new();
        }

        let Some(active) = cursor.active.clone() else {
            return vec![Warning::at_line(
                line_number,
                "continuation",
                format!("'{}' does not continue any field", value),
            )];
        };

        if let Some(slot) = cursor.block.text_field(site, &active.name) {
            append_line(slot, value);
            return Vec::new();
        }
        if active.known {
            return vec![Warning::at_line(
                line_number,
                active.key,
                format!("continuation '{}' ignored for a single-line field", value),
            )];
        }
        Vec::new()
    }

    fn text(&self, cursor: &mut Cursor, site: &mut Site, text: &str, line_number: usize) -> Vec<Warning> {
        if cursor.block.is_ignored() || is_placeholder(text) {
            return Vec::new();
        }
        if matches!(cursor.block, BlockState::OtherInstrumentation) {
            append_line(&mut site.other_instrumentation, text);
            return Vec::new();
        }

        if let Some(active) = cursor.active.clone() {
            if is_free_text(&active.name) {
                if let Some(slot) = cursor.block.text_field(site, &active.name) {
                    append_line(slot, text);
                    return Vec::new();
                }
            }
        }

        vec![Warning::at_line(
            line_number,
            "line",
            format!("unexpected text '{}' skipped", text),
        )]
    }

    /// Fill a missing identifier from the file name
    fn identify(&self, site: &mut Site, file_name: Option<&str>) -> Vec<Warning> {
        let id = &mut site.identification;
        if !id.four_character_id.is_empty() || !id.nine_character_id.is_empty() {
            return Vec::new();
        }

        match file_name.and_then(|name| self.filenames.identify(name)) {
            Some(station) => {
                let warning = Warning::new(
                    "Four Character ID",
                    format!(
                        "site identifier missing, using {} from the file name",
                        station.four_character_id
                    ),
                );
                id.four_character_id = station.four_character_id;
                id.nine_character_id = station.nine_character_id.unwrap_or_default();
                vec![warning]
            }
            None => vec![Warning::new("Four Character ID", "site identifier missing")],
        }
    }
}

fn append_line(slot: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !slot.is_empty() {
        slot.push('\n');
    }
    slot.push_str(text);
}
