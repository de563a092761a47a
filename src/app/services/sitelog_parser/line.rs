//! Line classification for site logs
//!
//! Every line of a site log is one of: blank, numbered block heading, section
//! caption, `key : value` field (optionally prefixed by a sub-block label such
//! as `3.2` or `8.1.1`), continuation of the previous field, or free text.

use super::field_parsers::{compile, normalize_key};
use crate::Result;
use crate::constants::sitelog::captions;
use regex::Regex;

/// Structural captions inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caption {
    IfUpdate,
    ApproximatePosition,
    DifferentialComponents,
    PrimaryContact,
    SecondaryContact,
    HardcopyOnFile,
    AntennaGraphics,
}

impl Caption {
    const ALL: [(Caption, &'static str); 7] = [
        (Caption::IfUpdate, captions::IF_UPDATE),
        (Caption::ApproximatePosition, captions::APPROXIMATE_POSITION),
        (Caption::DifferentialComponents, captions::DIFFERENTIAL_COMPONENTS),
        (Caption::PrimaryContact, captions::PRIMARY_CONTACT),
        (Caption::SecondaryContact, captions::SECONDARY_CONTACT),
        (Caption::HardcopyOnFile, captions::HARDCOPY_ON_FILE),
        (Caption::AntennaGraphics, captions::ANTENNA_GRAPHICS),
    ];

    /// Recognize a caption; only the first two words need to match
    ///
    /// Older logs say "GPS Marker" where newer ones say "GNSS Marker", so
    /// long captions are compared by their leading words.
    pub fn from_text(text: &str) -> Option<Caption> {
        let text = normalize_key(text);
        if text.is_empty() {
            return None;
        }
        Self::ALL.iter().find_map(|(caption, label)| {
            let prefix: String = label.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
            let prefix = normalize_key(&prefix);
            (text == normalize_key(label) || text.starts_with(&prefix)).then_some(*caption)
        })
    }
}

/// One classified line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    Blank,

    /// `3.   GNSS Receiver Information`
    Heading { number: u8, title: &'a str },

    Caption(Caption),

    /// `3.2  Receiver Type : LEICA GR50` or `Serial Number : 1830399`
    Field {
        label: Option<&'a str>,
        /// Key as written, e.g. "Receiver Type"
        key: &'a str,
        /// Key used for matching, e.g. "receivertype"
        name: String,
        value: &'a str,
    },

    /// `                              : second line of a value`
    Continuation(&'a str),

    /// Anything else, trimmed
    Text(&'a str),
}

/// Classifier for site log lines
#[derive(Debug, Clone)]
pub struct LineClassifier {
    key_width: usize,
    heading: Regex,
    label: Regex,
}

impl LineClassifier {
    pub fn new(key_width: usize) -> Result<Self> {
        Ok(Self {
            key_width,
            heading: compile(r"^(\d{1,2})\.\s+(\S.*)$")?,
            label: compile(r"^(\d{1,2}(?:\.(?:\d{1,2}|[xX]))+)\s+(\S.*)$")?,
        })
    }

    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }

        let colon = line.find(':').filter(|&position| position < self.key_width);

        let Some(colon) = colon else {
            if let Some(captures) = self.heading.captures(line) {
                if let (Some(number), Some(title)) = (captures.get(1), captures.get(2)) {
                    if let Ok(number) = number.as_str().parse::<u8>() {
                        return LineKind::Heading {
                            number,
                            title: title.as_str().trim_end(),
                        };
                    }
                }
            }
            if let Some(caption) = Caption::from_text(trimmed) {
                return LineKind::Caption(caption);
            }
            return LineKind::Text(trimmed);
        };

        let key_part = line[..colon].trim();
        let value = line[colon + 1..].trim();

        if key_part.is_empty() {
            return LineKind::Continuation(value);
        }
        if value.is_empty() && Caption::from_text(key_part) == Some(Caption::IfUpdate) {
            return LineKind::Caption(Caption::IfUpdate);
        }

        let (label, key) = match self.label.captures(key_part) {
            Some(captures) => match (captures.get(1), captures.get(2)) {
                (Some(label), Some(key)) => (Some(label.as_str()), key.as_str().trim()),
                _ => (None, key_part),
            },
            None => (None, key_part),
        };

        LineKind::Field {
            label,
            key,
            name: normalize_key(key),
            value,
        }
    }
}

/// Whether a sub-block label is an unfilled template such as `3.x` or `8.1.x`
pub fn is_placeholder_label(label: &str) -> bool {
    label.ends_with(".x") || label.ends_with(".X")
}

/// Block number a sub-block label belongs to
pub fn label_block(label: &str) -> Option<u8> {
    label.split('.').next().and_then(|number| number.parse().ok())
}
