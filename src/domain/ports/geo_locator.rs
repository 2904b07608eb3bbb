//! Geolocation Port
//!
//! Defines the interface for resolving a client address to a location.

use crate::domain::entities::ResolvedLocation;
use crate::domain::error::BedtimeError;
use crate::domain::value_objects::ClientAddress;
use async_trait::async_trait;

/// Resolver for client address to geographic location.
///
/// This is an outbound port that abstracts the third-party IP geolocation
/// service. Implementations perform exactly one lookup per call and never
/// retry.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Look up the location of `addr`.
    ///
    /// Fails with `Upstream` when the service is unreachable or answers with
    /// an error status, and with `Data` when the payload has no usable
    /// city or coordinates.
    async fn locate(&self, addr: &ClientAddress) -> Result<ResolvedLocation, BedtimeError>;
}
