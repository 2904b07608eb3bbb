//! Sunrise Proxy
//!
//! Validates raw coordinates and forwards them to the sunrise provider.
//! No caching, no retries.

use crate::domain::entities::SunriseResult;
use crate::domain::error::BedtimeError;
use crate::domain::ports::SunriseProvider;
use crate::domain::value_objects::Coordinates;
use std::sync::Arc;

pub struct SunriseProxy {
    provider: Arc<dyn SunriseProvider>,
}

impl SunriseProxy {
    pub fn new(provider: Arc<dyn SunriseProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the sunrise for the raw `lat` / `lng` query values.
    pub async fn get_sunrise(
        &self,
        lat: Option<&str>,
        lng: Option<&str>,
    ) -> Result<SunriseResult, BedtimeError> {
        let coords = Coordinates::parse(lat, lng)?;
        tracing::debug!("fetching sunrise for {},{}", coords.lat, coords.lng);

        self.provider.next_sunrise(coords).await
    }
}
