//! Sitelog Processor Library
//!
//! A Rust library for turning GNSS station metadata into station-info intervals.
//!
//! This library provides tools for:
//! - Decoding SINEX files block by block with fixed-column record decoders
//! - Decoding IGS site logs (numbered key/value blocks) into a `Site`
//! - Cleaning receiver and antenna histories into strictly ordered timelines
//! - Reconciling both timelines into the minimal set of station-info intervals
//! - Collecting non-fatal issues as warnings instead of aborting

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod sinex_parser;
        pub mod site_history;
        pub mod sitelog_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::site::Site;
pub use app::models::{Antenna, Device, Receiver, StationInterval, TimeRange, Warning};
pub use config::Config;

/// Result type alias for the sitelog processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for decoding and reconciling station metadata
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A field could not be decoded
    #[error("format error at line {line}, field '{field}' ('{raw}'): {cause}")]
    Format {
        line: usize,
        field: String,
        raw: String,
        cause: String,
    },

    /// A block that must be present was missing or misnamed
    #[error("mandatory block not found: {block}")]
    MandatoryBlockNotFound { block: String },

    /// A sub-block label appeared twice within one block
    #[error("duplicate sub-block {label} at line {line}")]
    DuplicateSubBlock { line: usize, label: String },

    /// Device dates are out of chronological order
    #[error("{item}: dates of entry {index_curr} conflict with entry {index_prev}")]
    Chronological {
        item: String,
        index_prev: usize,
        index_curr: usize,
    },

    /// A device boundary date is missing and cannot be inferred
    #[error("{item}: installation date of entry {index} is missing and cannot be inferred")]
    MissingDate { item: String, index: usize },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Invariant violation, not expected for cleaned input
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a located format error
    pub fn format(
        line: usize,
        field: impl Into<String>,
        raw: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        Self::Format {
            line,
            field: field.into(),
            raw: raw.into(),
            cause: cause.into(),
        }
    }

    /// Create a missing mandatory block error
    pub fn mandatory_block_not_found(block: impl Into<String>) -> Self {
        Self::MandatoryBlockNotFound {
            block: block.into(),
        }
    }

    /// Create a duplicate sub-block error
    pub fn duplicate_sub_block(line: usize, label: impl Into<String>) -> Self {
        Self::DuplicateSubBlock {
            line,
            label: label.into(),
        }
    }

    /// Create a chronological violation error
    pub fn chronological(item: impl Into<String>, index_prev: usize, index_curr: usize) -> Self {
        Self::Chronological {
            item: item.into(),
            index_prev,
            index_curr,
        }
    }

    /// Create a missing date error
    pub fn missing_date(item: impl Into<String>, index: usize) -> Self {
        Self::MissingDate {
            item: item.into(),
            index,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Line number the error points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Format { line, .. } | Self::DuplicateSubBlock { line, .. } => Some(*line),
            _ => None,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
