//! API route definitions
//!
//! Endpoints for the irrigation dashboard UI shell:
//! - /api/v1/login, /api/v1/logout - session gate
//! - /api/v1/dashboard - weather + simulated sensor series
//! - /api/v1/reports - stored sensor series (JSON or CSV)
//! - /api/v1/recommendation, /api/v1/chat - inference orchestration
//! - /api/v1/settings - threshold relay to the telemetry channel
//! - /api/v1/strings/:locale - label catalog

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        // Session gate (login is the only unauthenticated POST)
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        // Views
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/reports", get(handlers::get_reports))
        // Orchestration
        .route("/recommendation", post(handlers::post_recommendation))
        .route("/chat", post(handlers::post_chat))
        // Settings with telemetry relay
        .route("/settings", post(handlers::post_settings))
        // Locale catalog (needed before login for form labels)
        .route("/strings/:locale", get(handlers::get_strings))
        // Liveness
        .route("/health", get(handlers::get_health))
        .with_state(state)
}

/// Legacy health endpoint at root level
pub fn legacy_routes() -> Router {
    Router::new().route("/health", get(handlers::get_health))
}
