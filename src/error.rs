//! Crate-wide error taxonomy
//!
//! Every external-call failure is converted into one of these variants at the
//! client boundary and surfaced to the caller as a user-visible condition.

/// Errors produced by IRRIGOS clients and the session gate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The inference service could not be reached or returned a non-success status.
    #[error("inference service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A weather, telemetry, or geolocation fetch failed.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// Username/password pair was rejected by the credential provider.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Required configuration was absent at startup. Fatal before serving.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// The caller cancelled an in-flight outbound request.
    #[error("request cancelled")]
    Cancelled,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
