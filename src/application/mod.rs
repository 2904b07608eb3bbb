//! Application Layer
//!
//! Use cases that orchestrate domain ports.

pub mod bedtime_presenter;
mod location_resolver;
mod sunrise_proxy;

pub use bedtime_presenter::{BedtimePresenter, PresenterError};
pub use location_resolver::{loopback_location, LocationResolver, LOOPBACK_LOCATION};
pub use sunrise_proxy::SunriseProxy;
