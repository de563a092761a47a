//! SINEX decoder for station metadata blocks
//!
//! This module provides a streaming, block-structured decoder for SINEX files
//! and record decoders for the site blocks that describe equipment history.
//!
//! ## Architecture
//!
//! - [`field_parsers`] - Fixed-column extraction and epoch/angle parsing
//! - [`header`] - `%=SNX` header line and FILE/REFERENCE contents
//! - [`reader`] - Block and record cursor over a line source
//! - [`records`] - SITE/* and SOLUTION/* record layouts
//! - [`sites`] - Assembly of records into `Site` aggregates
//!
//! ## Usage
//!
//! ```rust
//! use sitelog_processor::app::services::sinex_parser::SinexReader;
//! use sitelog_processor::app::services::sinex_parser::records::SiteReceiver;
//!
//! # fn example(text: &str) -> sitelog_processor::Result<()> {
//! let mut reader = SinexReader::new(text.as_bytes())?;
//! while reader.advance_block()? {
//!     if reader.current_block() != "SITE/RECEIVER" {
//!         continue;
//!     }
//!     while reader.advance_record()? {
//!         let receiver: SiteReceiver = reader.decode()?;
//!         println!("{} {}", receiver.key.code, receiver.receiver_type);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod field_parsers;
pub mod header;
pub mod reader;
pub mod records;
pub mod sites;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use field_parsers::ColumnDecoder;
pub use header::{FileReference, Header};
pub use reader::SinexReader;
pub use records::FromSinexLine;
pub use sites::{SinexSites, decode_sinex_sites};
