//! ipapi Geo Locator
//!
//! Implements GeoLocator over the ipapi.co HTTP API.
//!
//! See: https://ipapi.co/api/

use crate::domain::entities::ResolvedLocation;
use crate::domain::error::BedtimeError;
use crate::domain::ports::GeoLocator;
use crate::domain::value_objects::ClientAddress;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

/// Default base URL of the geolocation service.
pub const DEFAULT_GEO_API_URL: &str = "https://ipapi.co";

/// Geolocation over HTTP.
///
/// Issues `GET {base_url}/{ip}/json/` once per lookup. The address always
/// comes from the caller so the server never geolocates itself; anything
/// that is not an IP address is rejected before a URL is built.
pub struct IpApiGeoLocator {
    base_url: String,
    client: reqwest::Client,
}

impl IpApiGeoLocator {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn lookup_url(&self, addr: &ClientAddress) -> Result<Url, BedtimeError> {
        if addr.ip().is_none() {
            return Err(BedtimeError::invalid_input(format!("Invalid client IP: {}", addr)));
        }

        let invalid_base = || {
            BedtimeError::upstream(format!("Invalid geolocation API URL: {}", self.base_url))
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .push(addr.as_str())
            .push("json")
            .push("");
        Ok(url)
    }
}

#[async_trait]
impl GeoLocator for IpApiGeoLocator {
    async fn locate(&self, addr: &ClientAddress) -> Result<ResolvedLocation, BedtimeError> {
        let url = self.lookup_url(addr)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown Status");
            tracing::error!("geolocation API error: {} - {}", status.as_u16(), reason);
            return Err(BedtimeError::upstream_status(status.as_u16(), reason));
        }

        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body)
            .map_err(|e| BedtimeError::data(format!("Malformed geolocation payload: {}", e)))?;
        tracing::debug!("geolocation response for {}: {}", addr, payload);

        normalize(&payload)
    }
}

/// Turn a geolocation payload into a `ResolvedLocation`.
///
/// Accepts the field variants seen across providers: `country_name` or
/// `country`, `latitude`/`lat` and `longitude`/`lng` (numbers or numeric
/// strings), or a combined `loc` of the form `"lat,lng"`.
pub fn normalize(payload: &Value) -> Result<ResolvedLocation, BedtimeError> {
    if payload.get("error").and_then(Value::as_bool) == Some(true) {
        let reason = payload
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("unknown reason");
        return Err(BedtimeError::upstream(format!("External API error: {}", reason)));
    }

    let city = non_empty_str(payload, "city")
        .ok_or_else(|| BedtimeError::data("Geolocation response is missing city"))?;
    let country = non_empty_str(payload, "country_name")
        .or_else(|| non_empty_str(payload, "country"))
        .ok_or_else(|| BedtimeError::data("Geolocation response is missing country"))?;

    let (lat, lng) = match (
        coordinate(payload, &["latitude", "lat"]),
        coordinate(payload, &["longitude", "lng"]),
    ) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => combined_loc(payload)
            .ok_or_else(|| BedtimeError::data("Geolocation response is missing coordinates"))?,
    };

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(BedtimeError::data(format!(
            "Geolocation coordinates out of range: {},{}",
            lat, lng
        )));
    }

    Ok(ResolvedLocation::from_parts(city, country, lat, lng))
}

fn non_empty_str<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn coordinate(payload: &Value, fields: &[&str]) -> Option<f64> {
    fields
        .iter()
        .filter_map(|f| payload.get(*f))
        .find_map(as_f64)
        .filter(|v| v.is_finite())
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn combined_loc(payload: &Value) -> Option<(f64, f64)> {
    let (lat, lng) = non_empty_str(payload, "loc")?.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ===== Normalization Tests =====

    #[test]
    fn test_normalize_ipapi_payload() {
        let payload = json!({
            "ip": "203.0.113.7",
            "city": "Paris",
            "country": "FR",
            "country_name": "France",
            "latitude": 48.85,
            "longitude": 2.35
        });

        let loc = normalize(&payload).unwrap();
        assert_eq!(loc, ResolvedLocation::new("Paris, France", 48.85, 2.35));
    }

    #[test]
    fn test_normalize_falls_back_to_country() {
        let payload = json!({
            "city": "Lisbon",
            "country": "Portugal",
            "lat": 38.72,
            "lng": -9.14
        });
        let loc = normalize(&payload).unwrap();
        assert_eq!(loc.location, "Lisbon, Portugal");
        assert_eq!(loc.lng, -9.14);
    }

    #[test]
    fn test_normalize_combined_loc() {
        let payload = json!({
            "city": "Mountain View",
            "country": "US",
            "loc": "37.3860,-122.0838"
        });
        let loc = normalize(&payload).unwrap();
        assert_eq!(loc.lat, 37.386);
        assert_eq!(loc.lng, -122.0838);
    }

    #[test]
    fn test_normalize_numeric_strings() {
        let payload = json!({
            "city": "Oslo",
            "country_name": "Norway",
            "latitude": "59.91",
            "longitude": "10.75"
        });
        let loc = normalize(&payload).unwrap();
        assert_eq!(loc.lat, 59.91);
    }

    #[test]
    fn test_normalize_missing_coordinates_is_data_error() {
        let payload = json!({"city": "Paris", "country_name": "France"});
        assert!(matches!(normalize(&payload), Err(BedtimeError::Data(_))));
    }

    #[test]
    fn test_normalize_malformed_coordinates_is_data_error() {
        let payload = json!({
            "city": "Paris",
            "country_name": "France",
            "latitude": "north",
            "longitude": 2.35
        });
        assert!(matches!(normalize(&payload), Err(BedtimeError::Data(_))));

        let payload = json!({
            "city": "Paris",
            "country_name": "France",
            "latitude": 148.0,
            "longitude": 2.35
        });
        assert!(matches!(normalize(&payload), Err(BedtimeError::Data(_))));
    }

    #[test]
    fn test_normalize_missing_city_is_data_error() {
        let payload = json!({
            "city": null,
            "country_name": "France",
            "latitude": 48.85,
            "longitude": 2.35
        });
        assert!(matches!(normalize(&payload), Err(BedtimeError::Data(_))));
    }

    #[test]
    fn test_normalize_error_envelope_is_upstream_error() {
        let payload = json!({"error": true, "reason": "RateLimited"});
        let err = normalize(&payload).unwrap_err();
        assert_eq!(err, BedtimeError::upstream("External API error: RateLimited"));
    }

    // ===== HTTP Tests with Mock Server =====

    #[tokio::test]
    async fn test_locate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/203.0.113.7/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": "Paris",
                "country_name": "France",
                "latitude": 48.85,
                "longitude": 2.35
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let locator = IpApiGeoLocator::new(mock_server.uri(), reqwest::Client::new());
        let loc = locator.locate(&ClientAddress::new("203.0.113.7")).await.unwrap();

        assert_eq!(loc, ResolvedLocation::new("Paris, France", 48.85, 2.35));
    }

    #[tokio::test]
    async fn test_locate_trailing_slash_base_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/198.51.100.4/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": "Recife",
                "country_name": "Brazil",
                "latitude": -8.05,
                "longitude": -34.9
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/", mock_server.uri());
        let locator = IpApiGeoLocator::new(base_url, reqwest::Client::new());
        let loc = locator.locate(&ClientAddress::new("198.51.100.4")).await.unwrap();
        assert_eq!(loc.location, "Recife, Brazil");
    }

    #[tokio::test]
    async fn test_locate_ipv6_address() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/2001:db8::1/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": "Berlin",
                "country_name": "Germany",
                "latitude": 52.52,
                "longitude": 13.4
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let locator = IpApiGeoLocator::new(mock_server.uri(), reqwest::Client::new());
        let loc = locator.locate(&ClientAddress::new("2001:db8::1")).await.unwrap();
        assert_eq!(loc.location, "Berlin, Germany");
    }

    #[tokio::test]
    async fn test_locate_rejects_non_ip_before_any_request() {
        let mock_server = MockServer::start().await;

        // A dot segment in the header would otherwise collapse into the
        // server's own lookup at `/json/`
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "city": "Server City",
                "country_name": "Nowhere",
                "latitude": 0.0,
                "longitude": 0.0
            })))
            .expect(0)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(0)
            .mount(&mock_server)
            .await;

        let locator = IpApiGeoLocator::new(mock_server.uri(), reqwest::Client::new());
        for raw in ["..", "1.2.3.4/..", "1.2.3.4/../..", "?", "1.2.3.4#x", "%2e%2e"] {
            let err = locator.locate(&ClientAddress::new(raw)).await.unwrap_err();
            assert_eq!(err, BedtimeError::invalid_input(format!("Invalid client IP: {}", raw)));
        }
    }

    #[test]
    fn test_lookup_url_is_single_segment() {
        let locator = IpApiGeoLocator::new("http://geo.local/v1/", reqwest::Client::new());

        let url = locator.lookup_url(&ClientAddress::new("203.0.113.7")).unwrap();
        assert_eq!(url.as_str(), "http://geo.local/v1/203.0.113.7/json/");

        let url = locator.lookup_url(&ClientAddress::new("2001:db8::1")).unwrap();
        assert_eq!(url.path(), "/v1/2001:db8::1/json/");
    }

    #[test]
    fn test_lookup_url_invalid_base() {
        let locator = IpApiGeoLocator::new("not a url", reqwest::Client::new());
        let err = locator.lookup_url(&ClientAddress::new("203.0.113.7")).unwrap_err();
        assert!(matches!(err, BedtimeError::Upstream { status: None, .. }));
    }

    #[tokio::test]
    async fn test_locate_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&mock_server)
            .await;

        let locator = IpApiGeoLocator::new(mock_server.uri(), reqwest::Client::new());
        let err = locator
            .locate(&ClientAddress::new("203.0.113.7"))
            .await
            .unwrap_err();

        assert_eq!(err.upstream_status_code(), Some(429));
        assert_eq!(err.to_string(), "External API error: Too Many Requests");
    }

    #[tokio::test]
    async fn test_locate_non_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let locator = IpApiGeoLocator::new(mock_server.uri(), reqwest::Client::new());
        let err = locator
            .locate(&ClientAddress::new("203.0.113.7"))
            .await
            .unwrap_err();

        assert!(matches!(err, BedtimeError::Data(_)));
    }

    #[tokio::test]
    async fn test_locate_unreachable() {
        // Nothing listens on port 1
        let locator = IpApiGeoLocator::new("http://127.0.0.1:1", reqwest::Client::new());
        let err = locator
            .locate(&ClientAddress::new("203.0.113.7"))
            .await
            .unwrap_err();

        assert!(matches!(err, BedtimeError::Upstream { status: None, .. }));
    }
}
