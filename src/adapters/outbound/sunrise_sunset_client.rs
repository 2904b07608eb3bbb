//! Sunrise-Sunset Client
//!
//! Implements SunriseProvider over the sunrise-sunset.org JSON API.

use crate::domain::entities::SunriseResult;
use crate::domain::error::BedtimeError;
use crate::domain::ports::SunriseProvider;
use crate::domain::value_objects::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Default base URL of the sunrise service.
pub const DEFAULT_SUNRISE_API_URL: &str = "https://api.sunrise-sunset.org";

/// Message surfaced when the service answers but reports a failure.
const SUNRISE_FAILURE: &str = "Failed to fetch sunrise data";

/// Envelope returned by `/json?...&formatted=0`.
///
/// `results` is an object on success but an empty string on failure.
#[derive(Debug, Deserialize)]
struct SunriseEnvelope {
    status: Option<String>,
    #[serde(default)]
    results: Value,
}

pub struct SunriseSunsetClient {
    base_url: String,
    client: reqwest::Client,
}

impl SunriseSunsetClient {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl SunriseProvider for SunriseSunsetClient {
    async fn next_sunrise(&self, coords: Coordinates) -> Result<SunriseResult, BedtimeError> {
        let url = format!("{}/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lng", coords.lng.to_string()),
                ("formatted", "0".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown Status");
            tracing::error!("sunrise API error: {} - {}", status.as_u16(), reason);
            return Err(BedtimeError::upstream_status(status.as_u16(), reason));
        }

        let body = response.bytes().await?;
        let envelope: SunriseEnvelope = serde_json::from_slice(&body)
            .map_err(|e| BedtimeError::upstream(format!("{}: {}", SUNRISE_FAILURE, e)))?;

        unwrap_envelope(envelope)
    }
}

fn unwrap_envelope(envelope: SunriseEnvelope) -> Result<SunriseResult, BedtimeError> {
    match envelope.status.as_deref() {
        Some("OK") => {}
        other => {
            tracing::warn!("sunrise API reported status {:?}", other);
            return Err(BedtimeError::upstream(SUNRISE_FAILURE));
        }
    }

    envelope
        .results
        .get("sunrise")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(SunriseResult::new)
        .ok_or_else(|| BedtimeError::data("Sunrise response is missing results.sunrise"))
}
