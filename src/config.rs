//! Configuration management and validation.
//!
//! Provides the configuration structures for site log decoding, history
//! cleaning and interval reconciliation, with defaults matching the
//! behaviour expected by downstream station-info consumers.

use crate::constants::{DEFAULT_SHIFT_SECONDS, sitelog};
use crate::{Error, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level processing configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Device history cleaning
    pub history: HistoryConfig,

    /// Interval reconciliation
    pub reconcile: ReconcileConfig,

    /// Site log decoding
    pub sitelog: SitelogConfig,
}

impl Config {
    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.history.validate()?;
        self.sitelog.validate()?;
        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

/// Settings for the device history cleaner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Force-correct overlapping neighbours instead of failing
    pub force: bool,

    /// Size of the de-overlap shift in seconds
    pub shift_seconds: i64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            force: false,
            shift_seconds: DEFAULT_SHIFT_SECONDS,
        }
    }
}

impl HistoryConfig {
    /// Configuration with forced corrections enabled
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }

    /// The de-overlap shift as a duration
    pub fn shift(&self) -> Duration {
        Duration::seconds(self.shift_seconds)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shift_seconds <= 0 {
            return Err(Error::configuration(format!(
                "shift_seconds must be positive, got {}",
                self.shift_seconds
            )));
        }
        Ok(())
    }
}

/// Settings for the interval reconciler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Treat receivers differing only in firmware as the same configuration
    pub ignore_receiver_firmware: bool,
}

/// Settings for the site log decoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitelogConfig {
    /// Width of the key column
    pub key_width: usize,

    /// Record unknown keys as warnings rather than debug logs
    pub strict_unknown_fields: bool,
}

impl Default for SitelogConfig {
    fn default() -> Self {
        Self {
            key_width: sitelog::KEY_WIDTH,
            strict_unknown_fields: false,
        }
    }
}

impl SitelogConfig {
    pub fn validate(&self) -> Result<()> {
        // Field names plus a sub-block label must fit before the colon
        if self.key_width < 20 {
            return Err(Error::configuration(format!(
                "key_width {} is too narrow for site log keys",
                self.key_width
            )));
        }
        Ok(())
    }
}
