//! Location Resolver - Main application use case
//!
//! Turns an inbound request into a resolved location: extracts the client
//! address, short-circuits loopback, consults the cache and falls back to
//! the geolocation service.

use crate::domain::entities::ResolvedLocation;
use crate::domain::error::BedtimeError;
use crate::domain::ports::{GeoLocator, LocationCache};
use crate::domain::services::extract_client_ip;
use crate::domain::value_objects::ClientAddress;
use std::sync::Arc;

/// Location returned for loopback clients during local development.
pub const LOOPBACK_LOCATION: &str = "Maragogi, Brazil";
pub const LOOPBACK_LAT: f64 = -8.98323158618796;
pub const LOOPBACK_LNG: f64 = -35.18994999999999;

/// Fixed location served to loopback clients.
pub fn loopback_location() -> ResolvedLocation {
    ResolvedLocation::new(LOOPBACK_LOCATION, LOOPBACK_LAT, LOOPBACK_LNG)
}

/// Location resolver - the core use case.
///
/// The cache is owned by the composition root and injected here; no other
/// component writes to it.
pub struct LocationResolver {
    geo_locator: Arc<dyn GeoLocator>,
    cache: Arc<dyn LocationCache>,
}

impl LocationResolver {
    pub fn new(geo_locator: Arc<dyn GeoLocator>, cache: Arc<dyn LocationCache>) -> Self {
        Self { geo_locator, cache }
    }

    /// Resolve the caller's location from the raw `x-forwarded-for` and
    /// `x-real-ip` header values.
    pub async fn resolve(
        &self,
        forwarded_for: Option<&str>,
        real_ip: Option<&str>,
    ) -> Result<ResolvedLocation, BedtimeError> {
        let addr = extract_client_ip(forwarded_for, real_ip);
        tracing::debug!("extracted client IP: {}", addr);

        self.resolve_address(&addr).await
    }

    /// Resolve an already extracted address.
    ///
    /// 1. Loopback returns the mock location without touching cache or upstream
    /// 2. Anything that is not an IP address is rejected as invalid input
    /// 3. A live cache entry is returned verbatim
    /// 4. Otherwise one upstream lookup; only a success populates the cache
    pub async fn resolve_address(
        &self,
        addr: &ClientAddress,
    ) -> Result<ResolvedLocation, BedtimeError> {
        if addr.is_loopback() {
            tracing::debug!("using mock location for loopback address {}", addr);
            return Ok(loopback_location());
        }

        if addr.ip().is_none() {
            tracing::warn!("rejecting non-IP client address {:?}", addr.as_str());
            return Err(BedtimeError::invalid_input(format!("Invalid client IP: {}", addr)));
        }

        if let Some(hit) = self.cache.get(addr.as_str()) {
            tracing::debug!("cache hit for IP: {}", addr);
            return Ok(hit);
        }

        tracing::debug!("cache miss for IP: {}, fetching from geolocation API", addr);

        let location = match self.geo_locator.locate(addr).await {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!("location lookup failed for {}: {}", addr, e);
                return Err(e);
            }
        };

        // Concurrent misses for the same address may both land here; last write wins.
        self.cache.insert(addr.as_str().to_string(), location.clone());
        tracing::info!("cached location for {}: {}", addr, location.location);

        Ok(location)
    }

    /// Number of entries currently held by the cache.
    pub fn cached_locations(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached location.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
