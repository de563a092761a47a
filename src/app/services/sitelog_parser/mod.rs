//! IGS site log decoder
//!
//! Site logs are numbered blocks of `key : value` lines with a fixed-width key
//! column. This module decodes them into a `Site` in a single pass.
//!
//! ## Architecture
//!
//! - [`line`] - Classification of raw lines (headings, fields, continuations)
//! - [`field_parsers`] - Dates, effective ranges, numbers with units, angles
//! - [`blocks`] - Block state machine and per-block field tables
//! - [`filename`] - Station identifier from `ssss_ccyymmdd.log` style names
//! - [`parser`] - The line loop tying the above together
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitelog_processor::app::services::sitelog_parser::SitelogParser;
//! use sitelog_processor::config::SitelogConfig;
//! use std::path::Path;
//!
//! # fn example() -> sitelog_processor::Result<()> {
//! let parser = SitelogParser::new(SitelogConfig::default())?;
//! let site = parser.parse_file(Path::new("abmf00glp_20200101.log"))?;
//! for receiver in &site.receivers {
//!     println!("{} {:?}", receiver.receiver_type, receiver.time_range);
//! }
//! # Ok(())
//! # }
//! ```

pub mod blocks;
pub mod field_parsers;
pub mod filename;
pub mod line;
pub mod parser;

#[cfg(test)]
pub mod tests;

pub use blocks::BlockState;
pub use filename::{FilenamePattern, StationId};
pub use line::{Caption, LineClassifier, LineKind};
pub use parser::SitelogParser;
