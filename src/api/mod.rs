//! REST API module using Axum
//!
//! JSON contract toward the external UI shell. Page layout, widget
//! rendering, and form collection live entirely in the shell; this module
//! only answers its requests.

pub mod auth;
pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::DashboardState;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use self::envelope::ApiErrorResponse;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `IRRIGOS_CORS_ORIGINS` to a comma-separated list of allowed origins
/// for development (e.g., a local UI dev server).
fn build_cors_layer() -> CorsLayer {
    match std::env::var("IRRIGOS_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        }
        Err(_) => CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    }
}

/// Fallback for unmatched paths — the UI shell is served elsewhere.
async fn not_found() -> axum::response::Response {
    ApiErrorResponse::not_found("no such endpoint")
}

/// Create the complete application router.
pub fn create_app(state: DashboardState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state))
        .merge(routes::legacy_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
