//! Outbound HTTP clients — weather, telemetry, inference, geolocation
//!
//! Every client shares the same transport discipline: a bounded per-request
//! timeout, a bounded retry with exponential backoff for transient transport
//! errors, and cooperative cancellation through a [`CancellationToken`].
//! Non-success HTTP statuses are terminal (no retry) and mapped into the
//! crate error taxonomy at each client.

pub mod geolocate;
pub mod inference;
pub mod telemetry;
pub mod weather;

pub use geolocate::GeoLocator;
pub use inference::InferenceClient;
pub use telemetry::TelemetrySink;
pub use weather::WeatherClient;

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::HttpConfig;

/// Retry/timeout policy applied to every outbound request.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Per-request timeout, enforced by the underlying HTTP client.
    pub timeout: Duration,
    /// Additional attempts after the first (0 = single attempt).
    pub max_retries: u32,
    /// Base delay before the first retry, doubled each attempt.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(http: &HttpConfig) -> Self {
        Self {
            timeout: http.timeout(),
            max_retries: http.max_retries,
            backoff: http.backoff(),
        }
    }
}

/// Transport-level outcome before mapping into the crate taxonomy.
#[derive(Debug, thiserror::Error)]
pub(crate) enum OutboundError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request body cannot be cloned for retry")]
    NotCloneable,
    #[error("cancelled")]
    Cancelled,
}

/// Build the shared HTTP client with the policy's timeout applied.
pub(crate) fn build_http_client(policy: &RetryPolicy) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(policy.timeout)
        .build()
        .expect("Failed to build HTTP client")
}

/// Connection and timeout failures are worth retrying; everything else
/// (including any HTTP response) is terminal.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout()
}

/// Send a request with bounded retry, backoff, and cancellation.
pub(crate) async fn send_with_retry(
    req: &reqwest::RequestBuilder,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<reqwest::Response, OutboundError> {
    let mut attempt: u32 = 0;
    loop {
        let Some(builder) = req.try_clone() else {
            return Err(OutboundError::NotCloneable);
        };

        let result = tokio::select! {
            () = cancel.cancelled() => return Err(OutboundError::Cancelled),
            result = builder.send() => result,
        };

        match result {
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < policy.max_retries && is_transient(&e) => {
                let delay = policy.backoff * 2u32.saturating_pow(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient transport error, retrying"
                );
                tokio::select! {
                    () = cancel.cancelled() => return Err(OutboundError::Cancelled),
                    () = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
            Err(e) => return Err(OutboundError::Transport(e)),
        }
    }
}
