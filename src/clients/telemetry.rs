//! Telemetry sink — single-field status push to a ThingSpeak-style channel
//!
//! Fire-and-forget: one GET per push, no batching, no delivery guarantee
//! beyond the HTTP status code. The channel write key comes from
//! configuration; a missing key rejects the push instead of sending an
//! unauthenticated request.

use tokio_util::sync::CancellationToken;

use super::{build_http_client, send_with_retry, OutboundError, RetryPolicy};
use crate::config::TELEMETRY_WRITE_KEY_ENV;
use crate::error::Error;
use crate::types::TelemetryEvent;

/// HTTP client for the telemetry channel.
#[derive(Clone)]
pub struct TelemetrySink {
    http: reqwest::Client,
    base_url: String,
    write_key: String,
    policy: RetryPolicy,
}

impl TelemetrySink {
    pub fn new(base_url: &str, write_key: &str, policy: RetryPolicy) -> Self {
        Self {
            http: build_http_client(&policy),
            base_url: base_url.trim_end_matches('/').to_string(),
            write_key: write_key.to_string(),
            policy,
        }
    }

    /// Build the channel update URL with the value in `field2`.
    fn update_url(&self, value: u32) -> String {
        format!(
            "{}/update?api_key={}&field2={}",
            self.base_url, self.write_key, value
        )
    }

    /// Push one status event to the channel.
    pub async fn push_status(
        &self,
        event: TelemetryEvent,
        cancel: &CancellationToken,
    ) -> Result<(), Error> {
        if self.write_key.is_empty() {
            return Err(Error::MissingConfiguration(format!(
                "telemetry write key not set ({TELEMETRY_WRITE_KEY_ENV})"
            )));
        }

        let req = self.http.get(self.update_url(event.status_value));

        let resp = send_with_retry(&req, &self.policy, cancel)
            .await
            .map_err(|e| match e {
                OutboundError::Cancelled => Error::Cancelled,
                other => Error::FetchFailed(format!("telemetry push failed: {other}")),
            })?;

        if resp.status().is_success() {
            tracing::info!(value = event.status_value, "Pushed status to telemetry channel");
            Ok(())
        } else {
            Err(Error::FetchFailed(format!(
                "telemetry channel returned status {}",
                resp.status()
            )))
        }
    }
}
