mod geo_locator;
mod location_cache;
mod sunrise_provider;

pub use geo_locator::GeoLocator;
pub use location_cache::LocationCache;
pub use sunrise_provider::SunriseProvider;
