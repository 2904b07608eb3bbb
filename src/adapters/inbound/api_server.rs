//! Bedtime API Server
//!
//! HTTP surface for the location resolver and the sunrise proxy, plus the
//! single page that runs the bedtime pipeline in the browser.

use crate::application::{LocationResolver, SunriseProxy};
use crate::domain::error::BedtimeError;
use crate::domain::services::{FORWARDED_FOR_HEADER, REAL_IP_HEADER};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("index.html");

/// Query string of `/api/sunrise`.
///
/// Kept as raw strings so validation errors are reported by the proxy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SunriseQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cached_locations: usize,
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler-boundary error: maps the domain error to a status and JSON body.
#[derive(Debug)]
pub struct ApiError(pub BedtimeError);

impl ApiError {
    /// Status mirroring the cause: 400 for bad input, the upstream status
    /// when it is a real error status, otherwise 500.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BedtimeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BedtimeError::Upstream {
                status: Some(code), ..
            } => StatusCode::from_u16(*code)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            BedtimeError::Upstream { status: None, .. } | BedtimeError::Data(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<BedtimeError> for ApiError {
    fn from(err: BedtimeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub resolver: Arc<LocationResolver>,
    pub sunrise: Arc<SunriseProxy>,
}

impl ApiState {
    pub fn new(resolver: Arc<LocationResolver>, sunrise: Arc<SunriseProxy>) -> Self {
        Self { resolver, sunrise }
    }
}

/// Build the router with all routes and layers.
pub fn router(state: ApiState, cors_enabled: bool) -> Router {
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/location", get(location_handler))
        .route("/api/sunrise", get(sunrise_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_enabled {
        app.layer(
            CorsLayer::new()
                .allow_methods([Method::GET])
                .allow_origin(Any),
        )
    } else {
        app
    }
}

/// HTTP server for the bedtime API.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
    cors_enabled: bool,
}

impl ApiServer {
    pub fn new(listen_addr: String, state: ApiState, cors_enabled: bool) -> Self {
        Self {
            listen_addr,
            state,
            cors_enabled,
        }
    }

    /// Bind and serve until `shutdown` completes, then drain in-flight requests.
    pub async fn run<F>(&self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.listen_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state.clone(), self.cors_enabled);
        tracing::info!("bedtime API listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("bedtime API stopped");
        Ok(())
    }
}

// Handler functions

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cached_locations: state.resolver.cached_locations(),
    })
}

async fn location_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let forwarded_for = header_str(&headers, FORWARDED_FOR_HEADER);
    let real_ip = header_str(&headers, REAL_IP_HEADER);

    let location = state.resolver.resolve(forwarded_for, real_ip).await.map_err(|e| {
        tracing::error!("error processing location request: {}", e);
        ApiError(e)
    })?;
    Ok(Json(location))
}

/// Header value as text; non-UTF-8 values count as absent.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn sunrise_handler(
    State(state): State<ApiState>,
    Query(query): Query<SunriseQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sunrise = state
        .sunrise
        .get_sunrise(query.lat.as_deref(), query.lng.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("error processing sunrise request: {}", e);
            ApiError(e)
        })?;
    Ok(Json(sunrise))
}
