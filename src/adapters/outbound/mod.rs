mod dashmap_location_cache;
mod ipapi_geo_locator;
mod sunrise_sunset_client;

pub use dashmap_location_cache::{DashMapLocationCache, DEFAULT_LOCATION_TTL};
pub use ipapi_geo_locator::{IpApiGeoLocator, DEFAULT_GEO_API_URL};
pub use sunrise_sunset_client::{SunriseSunsetClient, DEFAULT_SUNRISE_API_URL};
