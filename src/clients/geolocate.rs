//! IP geolocation — best-effort coordinates for the caller's public IP
//!
//! Used once per dashboard render to pick the weather lookup location.
//! Failures are expected (air-gapped rigs, rate limits) and the caller falls
//! back to configured default coordinates.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{build_http_client, send_with_retry, OutboundError, RetryPolicy};
use crate::error::Error;
use crate::types::Coordinates;

#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
}

/// HTTP client for the IP-geolocation lookup.
#[derive(Clone)]
pub struct GeoLocator {
    http: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl GeoLocator {
    pub fn new(base_url: &str, policy: RetryPolicy) -> Self {
        Self {
            http: build_http_client(&policy),
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        }
    }

    /// Resolve the caller's approximate position. Best-effort accuracy.
    pub async fn locate(&self, cancel: &CancellationToken) -> Result<Coordinates, Error> {
        let req = self.http.get(format!("{}/json", self.base_url));

        let resp = send_with_retry(&req, &self.policy, cancel)
            .await
            .map_err(|e| match e {
                OutboundError::Cancelled => Error::Cancelled,
                other => Error::FetchFailed(format!("geolocation request failed: {other}")),
            })?;

        if !resp.status().is_success() {
            return Err(Error::FetchFailed(format!(
                "geolocation API returned status {}",
                resp.status()
            )));
        }

        let geo: GeoResponse = resp
            .json()
            .await
            .map_err(|e| Error::FetchFailed(format!("cannot parse geolocation body: {e}")))?;

        if geo.status != "success" {
            return Err(Error::FetchFailed(format!(
                "geolocation lookup reported status '{}'",
                geo.status
            )));
        }

        Ok(Coordinates {
            latitude: geo.lat,
            longitude: geo.lon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_body_success() {
        let body = r#"{"status":"success","lat":11.0168,"lon":76.9558,"city":"Coimbatore"}"#;
        let geo: GeoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(geo.status, "success");
        assert!((geo.lat - 11.0168).abs() < f64::EPSILON);
    }

    #[test]
    fn test_geo_body_failure_status() {
        let body = r#"{"status":"fail","message":"private range"}"#;
        let geo: GeoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(geo.status, "fail");
    }
}
