//! Weather client — current temperature from the Open-Meteo forecast API
//!
//! One GET per dashboard render, no caching, no unit conversion. The first
//! hourly temperature sample is treated as the "current" reading.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{build_http_client, send_with_retry, OutboundError, RetryPolicy};
use crate::error::Error;
use crate::types::WeatherReading;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlySeries,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    temperature_2m: Vec<f64>,
}

/// HTTP client for the forecast API.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl WeatherClient {
    pub fn new(base_url: &str, policy: RetryPolicy) -> Self {
        Self {
            http: build_http_client(&policy),
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        }
    }

    /// Fetch the current temperature for a coordinate pair.
    ///
    /// Non-success HTTP status and transport failures map to
    /// [`Error::FetchFailed`]; the caller renders an error notice instead of
    /// failing the whole dashboard.
    pub async fn current_temperature(
        &self,
        latitude: f64,
        longitude: f64,
        cancel: &CancellationToken,
    ) -> Result<WeatherReading, Error> {
        let req = self
            .http
            .get(format!("{}/v1/forecast", self.base_url))
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", "temperature_2m".to_string()),
            ]);

        let resp = send_with_retry(&req, &self.policy, cancel)
            .await
            .map_err(|e| match e {
                OutboundError::Cancelled => Error::Cancelled,
                other => Error::FetchFailed(format!("weather request failed: {other}")),
            })?;

        if !resp.status().is_success() {
            return Err(Error::FetchFailed(format!(
                "weather API returned status {}",
                resp.status()
            )));
        }

        let forecast: ForecastResponse = resp
            .json()
            .await
            .map_err(|e| Error::FetchFailed(format!("cannot parse forecast body: {e}")))?;

        let temperature_celsius = forecast
            .hourly
            .temperature_2m
            .first()
            .copied()
            .ok_or_else(|| Error::FetchFailed("forecast contained no hourly samples".to_string()))?;

        Ok(WeatherReading {
            temperature_celsius,
        })
    }
}
