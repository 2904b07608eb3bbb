//! bedtime Library
//!
//! Exposes the bedtime components for use in integration tests and as a
//! library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{BedtimePresenter, LocationResolver, SunriseProxy};
pub use config::load_config;
pub use domain::entities::{Bedtime, ResolvedLocation, SunriseResult};
pub use domain::error::BedtimeError;
pub use domain::ports::{GeoLocator, LocationCache, SunriseProvider};
pub use domain::value_objects::{ClientAddress, Coordinates};
