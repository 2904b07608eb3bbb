//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.

use crate::domain::error::BedtimeError;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// IPv4 loopback literal, also the fallback when no proxy header is present.
pub const LOOPBACK_V4: &str = "127.0.0.1";
/// IPv6 loopback literal.
pub const LOOPBACK_V6: &str = "::1";

/// Client address exactly as observed in request headers.
///
/// The string is not canonicalized: it is used verbatim as the cache key.
/// Header values are client controlled, so it is only parsed when it has to
/// go onto the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientAddress(String);

impl ClientAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// The fallback address used when no proxy header identifies the client.
    pub fn loopback() -> Self {
        Self::new(LOOPBACK_V4)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the loopback literals used in local development.
    pub fn is_loopback(&self) -> bool {
        self.0 == LOOPBACK_V4 || self.0 == LOOPBACK_V6
    }

    /// The address as an IP, or `None` if the header carried anything else.
    pub fn ip(&self) -> Option<IpAddr> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for ClientAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, BedtimeError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(BedtimeError::invalid_input(format!(
                "lat out of range: {}",
                lat
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(BedtimeError::invalid_input(format!(
                "lng out of range: {}",
                lng
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Parse the raw `lat` / `lng` query values.
    pub fn parse(lat: Option<&str>, lng: Option<&str>) -> Result<Self, BedtimeError> {
        let lat = parse_component("lat", lat)?;
        let lng = parse_component("lng", lng)?;
        Self::new(lat, lng)
    }
}

fn parse_component(name: &str, raw: Option<&str>) -> Result<f64, BedtimeError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            BedtimeError::invalid_input(format!("Missing required parameter: {}", name))
        })?;

    raw.parse::<f64>()
        .map_err(|_| BedtimeError::invalid_input(format!("Invalid {}: {}", name, raw)))
}
