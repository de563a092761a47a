//! Device history services
//!
//! - [`cleaner`] - Infers missing boundaries and removes overlaps in receiver
//!   and antenna histories
//! - [`reconciler`] - Merges the cleaned histories into station-info intervals
//!
//! Both decoders produce a `Site`; cleaning is applied to it in place and the
//! intervals borrow from the cleaned site:
//!
//! ```rust
//! use sitelog_processor::app::services::site_history::{clean_site_history, station_intervals};
//! use sitelog_processor::config::Config;
//! use sitelog_processor::Site;
//!
//! # fn example(mut site: Site) -> sitelog_processor::Result<()> {
//! let config = Config::default();
//! clean_site_history(&mut site, &config.history)?;
//! for interval in station_intervals(&site, &config.reconcile)? {
//!     println!("{} {:?} {}", interval.from, interval.to, interval.receiver.receiver_type);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cleaner;
pub mod reconciler;

#[cfg(test)]
pub mod tests;

pub use cleaner::{clean_antennas, clean_devices, clean_receivers, clean_site_history};
pub use reconciler::station_intervals;
