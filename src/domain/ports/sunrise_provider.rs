//! Sunrise Provider Port

use crate::domain::entities::SunriseResult;
use crate::domain::error::BedtimeError;
use crate::domain::value_objects::Coordinates;
use async_trait::async_trait;

/// Source of sunrise times for a coordinate pair.
///
/// Outbound port over the third-party sunrise/sunset service.
#[async_trait]
pub trait SunriseProvider: Send + Sync {
    /// Fetch the sunrise timestamp (ISO 8601, UTC) for `coords`.
    async fn next_sunrise(&self, coords: Coordinates) -> Result<SunriseResult, BedtimeError>;
}
