//! Domain Entities - Core business objects
//!
//! These entities are exchanged across the resolver and proxy boundaries.
//! They carry no I/O and serialize to the JSON shapes served by the API.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// A location resolved for a client address.
///
/// Produced by the loopback override, by a cache hit, or by normalizing
/// a fresh geolocation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Human readable "City, Country"
    pub location: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl ResolvedLocation {
    pub fn new(location: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            location: location.into(),
            lat,
            lng,
        }
    }

    /// Build a location from separate city and country names.
    pub fn from_parts(city: &str, country: &str, lat: f64, lng: f64) -> Self {
        Self::new(format!("{}, {}", city, country), lat, lng)
    }
}

/// Normalized output of the sunrise proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunriseResult {
    /// ISO 8601 timestamp, passed through from the upstream service
    pub sunrise: String,
}

impl SunriseResult {
    pub fn new(sunrise: impl Into<String>) -> Self {
        Self {
            sunrise: sunrise.into(),
        }
    }
}

/// A cached location together with the moment it was stored.
///
/// Entries are immutable once written; a fresh write replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: ResolvedLocation,
    pub inserted_at: Instant,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(value: ResolvedLocation) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// Whether the entry is older than `ttl` as of `now`.
    pub fn is_expired_at(&self, now: Instant, ttl: std::time::Duration) -> bool {
        now.duration_since(self.inserted_at) >= ttl
    }
}

/// The computed bedtime for one page load.
#[derive(Debug, Clone, PartialEq)]
pub struct Bedtime {
    pub location: String,
    pub sunrise: DateTime<FixedOffset>,
    pub bedtime: DateTime<FixedOffset>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;

    // ===== ResolvedLocation Tests =====

    #[test]
    fn test_from_parts_joins_city_and_country() {
        let loc = ResolvedLocation::from_parts("Paris", "France", 48.85, 2.35);
        assert_eq!(loc.location, "Paris, France");
        assert_eq!(loc.lat, 48.85);
        assert_eq!(loc.lng, 2.35);
    }

    #[test]
    fn test_resolved_location_serializes_to_api_shape() {
        let loc = ResolvedLocation::new("Paris, France", 48.85, 2.35);
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"location": "Paris, France", "lat": 48.85, "lng": 2.35})
        );
    }

    #[test]
    fn test_sunrise_result_serializes_to_api_shape() {
        let result = SunriseResult::new("2024-06-01T04:00:00+00:00");
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"sunrise":"2024-06-01T04:00:00+00:00"}"#);
    }

    // ===== CacheEntry Tests =====

    #[tokio::test(start_paused = true)]
    async fn test_cache_entry_expiry() {
        let entry = CacheEntry::new(ResolvedLocation::new("Paris, France", 48.85, 2.35));
        let ttl = Duration::from_secs(60);

        assert!(!entry.is_expired_at(Instant::now(), ttl));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(!entry.is_expired_at(Instant::now(), ttl));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(entry.is_expired_at(Instant::now(), ttl));
    }
}
