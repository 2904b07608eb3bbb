//! Domain Layer
//!
//! Entities, value objects, errors, ports and pure services.
//! Nothing in here performs I/O.

pub mod entities;
pub mod error;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Bedtime, CacheEntry, ResolvedLocation, SunriseResult};
pub use error::BedtimeError;
pub use value_objects::{ClientAddress, Coordinates};
