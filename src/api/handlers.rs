//! API route handlers
//!
//! Request handling logic for all dashboard endpoints: login/logout,
//! dashboard render data, sensor reports, recommendation and chat
//! orchestration, settings with telemetry relay, and locale strings.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::auth::SessionAuth;
use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::clients::{GeoLocator, InferenceClient, TelemetrySink, WeatherClient};
use crate::config::AppConfig;
use crate::i18n::Catalog;
use crate::recommend::RecommendationOrchestrator;
use crate::sensors::{self, DEFAULT_SERIES_LEN};
use crate::session::{SessionStore, StaticCredentials};
use crate::types::{
    Coordinates, SensorSample, SettingsUpdate, TelemetryEvent, UserQuery, WeatherReading,
};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionStore>,
    pub orchestrator: RecommendationOrchestrator,
    pub weather: WeatherClient,
    pub telemetry: TelemetrySink,
    pub geo: GeoLocator,
    pub catalog: Arc<Catalog>,
    /// Series produced by the last dashboard render; reports reads this same
    /// series so both views agree.
    pub sensor_series: Arc<RwLock<Option<Vec<SensorSample>>>>,
    /// Cancelled on shutdown to abort in-flight outbound calls.
    pub cancel: CancellationToken,
}

impl DashboardState {
    /// Build the full state with clients wired from configuration.
    pub fn new(config: Arc<AppConfig>, catalog: Catalog, cancel: CancellationToken) -> Self {
        let policy = crate::clients::RetryPolicy::from(&config.http);

        let inference = InferenceClient::new(
            &config.inference.base_url,
            &config.inference.api_key,
            &config.inference.model,
            policy.clone(),
        );
        let sessions = Arc::new(SessionStore::new(Arc::new(StaticCredentials::new(
            &config.auth,
        ))));

        Self {
            sessions,
            orchestrator: RecommendationOrchestrator::new(inference),
            weather: WeatherClient::new(&config.weather.base_url, policy.clone()),
            telemetry: TelemetrySink::new(
                &config.telemetry.base_url,
                &config.telemetry.write_key,
                policy.clone(),
            ),
            geo: GeoLocator::new(&config.geolocation.base_url, policy),
            catalog: Arc::new(catalog),
            sensor_series: Arc::new(RwLock::new(None)),
            cancel,
            config,
        }
    }
}

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    #[serde(flatten)]
    pub update: SettingsUpdate,
    pub locale: Option<String>,
}

#[derive(Debug, Serialize)]
struct DashboardPayload {
    location: Coordinates,
    weather: Option<WeatherReading>,
    /// Set when the weather fetch failed; other panels still render.
    weather_error: Option<String>,
    latest: Option<SensorSample>,
    series: Vec<SensorSample>,
}

#[derive(Debug, Serialize)]
struct SettingsPayload {
    auto_irrigation: bool,
    moisture_threshold: u32,
    telemetry_delivered: bool,
    message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/login — open a session for valid credentials.
pub async fn login(
    State(state): State<DashboardState>,
    Json(req): Json<LoginRequest>,
) -> Response {
    match state.sessions.login(&req.username, &req.password).await {
        Ok(session) => ApiResponse::ok(LoginResponse {
            token: session.token.to_string(),
            created_at: session.created_at.to_rfc3339(),
        }),
        Err(e) => ApiErrorResponse::from_error(&e),
    }
}

/// POST /api/v1/logout — close the caller's session.
pub async fn logout(auth: SessionAuth, State(state): State<DashboardState>) -> Response {
    state.sessions.logout(&auth.token).await;
    ApiResponse::ok(serde_json::json!({ "logged_out": true }))
}

/// GET /api/v1/dashboard — weather plus a fresh simulated sensor series.
///
/// The weather fetch is best-effort: a failed fetch sets `weather_error`
/// without blocking the sensor panels. The generated series is stored so the
/// reports view operates on the same sample.
pub async fn get_dashboard(_auth: SessionAuth, State(state): State<DashboardState>) -> Response {
    let location = match state.geo.locate(&state.cancel).await {
        Ok(coords) => coords,
        Err(e) => {
            warn!(error = %e, "Geolocation failed, using configured default coordinates");
            Coordinates {
                latitude: state.config.weather.default_latitude,
                longitude: state.config.weather.default_longitude,
            }
        }
    };

    let (weather, weather_error) = match state
        .weather
        .current_temperature(location.latitude, location.longitude, &state.cancel)
        .await
    {
        Ok(reading) => (Some(reading), None),
        Err(e) => {
            warn!(error = %e, "Weather fetch failed");
            (None, Some("Failed to fetch weather data.".to_string()))
        }
    };

    let series = sensors::generate_series(DEFAULT_SERIES_LEN);
    *state.sensor_series.write().await = Some(series.clone());

    ApiResponse::ok(DashboardPayload {
        location,
        weather,
        weather_error,
        latest: series.last().cloned(),
        series,
    })
}

/// GET /api/v1/reports — the series from the last dashboard render.
///
/// Generates a series only when no dashboard render has happened yet.
/// `?format=csv` returns the download body instead of the JSON envelope.
pub async fn get_reports(
    _auth: SessionAuth,
    State(state): State<DashboardState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let series = {
        let mut guard = state.sensor_series.write().await;
        guard
            .get_or_insert_with(|| sensors::generate_series(DEFAULT_SERIES_LEN))
            .clone()
    };

    if query.format.as_deref() == Some("csv") {
        let csv = sensors::series_to_csv(&series);
        return (
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"sensor_data.csv\"",
                ),
            ],
            csv,
        )
            .into_response();
    }

    ApiResponse::ok(serde_json::json!({ "series": series }))
}

/// POST /api/v1/recommendation — irrigation advice for a query.
pub async fn post_recommendation(
    _auth: SessionAuth,
    State(state): State<DashboardState>,
    Json(query): Json<UserQuery>,
) -> Response {
    match state.orchestrator.recommend(&query, &state.cancel).await {
        Ok(recommendation) => ApiResponse::ok(recommendation),
        Err(e) => ApiErrorResponse::from_error(&e),
    }
}

/// POST /api/v1/chat — free-form agronomy chat.
pub async fn post_chat(
    _auth: SessionAuth,
    State(state): State<DashboardState>,
    Json(req): Json<ChatRequest>,
) -> Response {
    if req.message.trim().is_empty() {
        return ApiErrorResponse::bad_request("Please enter a message.");
    }

    match state.orchestrator.chat(&req.message, &state.cancel).await {
        Ok(reply) => ApiResponse::ok(serde_json::json!({ "reply": reply })),
        Err(e) => ApiErrorResponse::from_error(&e),
    }
}

/// POST /api/v1/settings — store the irrigation settings and relay the
/// moisture threshold to the telemetry channel.
///
/// A failed push is reported in the payload but does not fail the settings
/// flow.
pub async fn post_settings(
    _auth: SessionAuth,
    State(state): State<DashboardState>,
    Json(req): Json<SettingsRequest>,
) -> Response {
    let locale = req
        .locale
        .unwrap_or_else(|| state.catalog.default_locale().to_string());

    let event = TelemetryEvent {
        status_value: req.update.moisture_threshold,
    };
    let telemetry_delivered = match state.telemetry.push_status(event, &state.cancel).await
    {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Telemetry push failed");
            false
        }
    };

    let message_key = if telemetry_delivered {
        "telemetry_ok"
    } else {
        "telemetry_failed"
    };

    ApiResponse::ok(SettingsPayload {
        auto_irrigation: req.update.auto_irrigation,
        moisture_threshold: req.update.moisture_threshold,
        telemetry_delivered,
        message: state.catalog.lookup(&locale, message_key),
    })
}

/// GET /api/v1/strings/:locale — full label table for the UI shell.
pub async fn get_strings(
    State(state): State<DashboardState>,
    Path(locale): Path<String>,
) -> Response {
    ApiResponse::ok(state.catalog.table(&locale))
}

/// GET /api/v1/health — liveness probe, unauthenticated.
pub async fn get_health() -> Response {
    ApiResponse::ok(serde_json::json!({
        "status": "ok",
        "service": "irrigos",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
