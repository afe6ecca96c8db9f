//! Session-token authentication extractor

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;
use uuid::Uuid;

use super::envelope::ApiErrorResponse;
use super::handlers::DashboardState;

/// Verified session identity. Rejects the request when the bearer token is
/// missing, malformed, or unknown to the session store.
pub struct SessionAuth {
    pub token: Uuid,
}

/// Extract Bearer token from the Authorization header.
fn extract_bearer(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[async_trait]
impl FromRequestParts<DashboardState> for SessionAuth {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DashboardState,
    ) -> Result<Self, Self::Rejection> {
        let raw = extract_bearer(parts)
            .ok_or_else(|| ApiErrorResponse::unauthorized("Missing Bearer token"))?;

        let token = Uuid::parse_str(raw)
            .map_err(|_| ApiErrorResponse::unauthorized("Malformed session token"))?;

        if !state.sessions.is_authenticated(&token).await {
            return Err(ApiErrorResponse::unauthorized("Not logged in"));
        }

        Ok(Self { token })
    }
}
