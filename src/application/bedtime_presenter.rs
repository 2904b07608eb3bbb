//! Bedtime Presenter
//!
//! Client-side orchestration against a running server: location first,
//! then sunrise for the returned coordinates, then the bedtime arithmetic.
//! The first failure aborts the whole pipeline.

use crate::domain::entities::{Bedtime, ResolvedLocation, SunriseResult};
use crate::domain::services::{compute_bedtime, parse_sunrise, FORWARDED_FOR_HEADER};
use chrono::{Local, TimeZone};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why the presenter could not produce a bedtime.
#[derive(Debug, Error)]
pub enum PresenterError {
    /// The server could not be reached.
    #[error("{0}")]
    Transport(String),

    /// The server answered with an error body; `message` is shown verbatim.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The server answered successfully with something we cannot use.
    #[error("{0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for PresenterError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

pub struct BedtimePresenter {
    base_url: String,
    client: reqwest::Client,
    forwarded_for: Option<String>,
}

impl BedtimePresenter {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            forwarded_for: None,
        }
    }

    /// Send `x-forwarded-for` with the location request, as a reverse proxy would.
    pub fn with_forwarded_for(mut self, ip: impl Into<String>) -> Self {
        self.forwarded_for = Some(ip.into());
        self
    }

    /// Run the location -> sunrise -> bedtime pipeline once.
    pub async fn fetch(&self) -> Result<Bedtime, PresenterError> {
        let mut request = self.client.get(format!("{}/api/location", self.base_url));
        if let Some(ip) = &self.forwarded_for {
            request = request.header(FORWARDED_FOR_HEADER, ip);
        }
        let location: ResolvedLocation = read_json(request, "Failed to fetch location").await?;

        let request = self
            .client
            .get(format!("{}/api/sunrise", self.base_url))
            .query(&[
                ("lat", location.lat.to_string()),
                ("lng", location.lng.to_string()),
            ]);
        let sunrise: SunriseResult = read_json(request, "Failed to fetch sunrise time").await?;

        let sunrise_at = parse_sunrise(&sunrise.sunrise).map_err(|e| {
            PresenterError::InvalidResponse(format!(
                "Invalid sunrise time {:?}: {}",
                sunrise.sunrise, e
            ))
        })?;

        Ok(Bedtime {
            location: location.location,
            sunrise: sunrise_at,
            bedtime: compute_bedtime(sunrise_at),
        })
    }
}

async fn read_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    fallback_error: &str,
) -> Result<T, PresenterError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback_error.to_string());
        return Err(PresenterError::Server {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|e| PresenterError::InvalidResponse(e.to_string()))
}

/// Render the view in the local time zone.
pub fn render(bedtime: &Bedtime) -> String {
    render_in(bedtime, &Local)
}

/// Render the view: bedtime as HH:MM, the location, then the raw sunrise.
pub fn render_in<Tz: TimeZone>(bedtime: &Bedtime, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}\n{}\nsunrise {}",
        bedtime.bedtime.with_timezone(tz).format("%H:%M"),
        bedtime.location,
        bedtime.sunrise.to_rfc3339(),
    )
}

/// Render a failure; nothing else is shown.
pub fn render_error(err: &PresenterError) -> String {
    format!("Error: {}", err)
}
