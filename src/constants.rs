//! Application constants for the sitelog processor
//!
//! This module contains format sentinels, column widths, alias tables and
//! default values used throughout the decoders and the history services.

// =============================================================================
// SINEX Format
// =============================================================================

/// SINEX line sentinels
pub mod sinex {
    /// First two bytes of the header line
    pub const HEADER_PREFIX: &str = "%=";

    /// Trailer line
    pub const TRAILER: &str = "%ENDSNX";

    /// Document type carried by the header line
    pub const DOCUMENT_TYPE: &str = "SNX";

    /// Block begin marker
    pub const BLOCK_BEGIN: char = '+';

    /// Block end marker
    pub const BLOCK_END: char = '-';

    /// Comment marker
    pub const COMMENT: char = '*';

    /// Data lines start with a blank
    pub const DATA: char = ' ';

    /// The zero epoch `00:000:00000` means "open" or "unset"
    pub const ZERO_EPOCH: &str = "00:000:00000";

    /// Two-digit years above this pivot belong to the 1900s
    pub const YEAR_PIVOT: i32 = 50;

    /// Block names
    pub const FILE_REFERENCE: &str = "FILE/REFERENCE";
    pub const SITE_ID: &str = "SITE/ID";
    pub const SITE_RECEIVER: &str = "SITE/RECEIVER";
    pub const SITE_ANTENNA: &str = "SITE/ANTENNA";
    pub const SITE_ECCENTRICITY: &str = "SITE/ECCENTRICITY";
    pub const SOLUTION_EPOCHS: &str = "SOLUTION/EPOCHS";
    pub const SOLUTION_ESTIMATE: &str = "SOLUTION/ESTIMATE";

    /// Block that must follow the header line
    pub const MANDATORY_FIRST_BLOCK: &str = FILE_REFERENCE;
}

// =============================================================================
// Site Log Format
// =============================================================================

/// Site log layout constants
pub mod sitelog {
    /// Width of the key column; a colon must appear before this offset
    pub const KEY_WIDTH: usize = 32;

    /// Width of the antenna model part of an A20 antenna type
    pub const ANTENNA_MODEL_WIDTH: usize = 16;

    /// Radome used when none is given
    pub const NO_RADOME: &str = "NONE";

    /// Captions that structure a block but carry no value
    pub mod captions {
        pub const IF_UPDATE: &str = "If Update:";
        pub const APPROXIMATE_POSITION: &str = "Approximate Position (ITRF)";
        pub const DIFFERENTIAL_COMPONENTS: &str =
            "Differential Components from GNSS Marker to the tied monument (ITRS)";
        pub const PRIMARY_CONTACT: &str = "Primary Contact";
        pub const SECONDARY_CONTACT: &str = "Secondary Contact";
        pub const HARDCOPY_ON_FILE: &str = "Hardcopy on File";
        pub const ANTENNA_GRAPHICS: &str = "Antenna Graphics with Dimensions";
    }

    /// Date template left in unfilled logs
    pub const DATE_TEMPLATE: &str = "CCYY-MM-DDThh:mmZ";

    /// Accepted date layouts, most specific first
    pub const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%MZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    /// Site log file names: `ssss_ccyymmdd.log` or `ssssmrccc_ccyymmdd.log`
    pub const FILENAME_PATTERN: &str = r"(?i)^([a-z0-9]{4})(\d{2}[a-z]{3})?_\d{8}\.log$";
}

// =============================================================================
// GNSS Satellite Systems
// =============================================================================

/// Known satellite system identifiers
pub const SATELLITE_SYSTEMS: &[&str] = &["GPS", "GLO", "GAL", "BDS", "QZSS", "SBAS", "IRNSS"];

/// Long names normalized to their short identifier
pub const SATELLITE_SYSTEM_ALIASES: &[(&str, &str)] = &[
    ("GLONASS", "GLO"),
    ("GALILEO", "GAL"),
    ("BEIDOU", "BDS"),
    ("NAVIC", "IRNSS"),
];

// =============================================================================
// History Defaults
// =============================================================================

/// Seconds a boundary is moved to de-overlap neighbouring devices
pub const DEFAULT_SHIFT_SECONDS: i64 = 1;
