//! IRRIGOS: Smart Irrigation Operational Intelligence
//!
//! Service backend for an irrigation dashboard UI shell.
//!
//! ## Architecture
//!
//! - **Clients**: weather (forecast API), telemetry (status channel),
//!   inference (chat completion), IP geolocation
//! - **Orchestrator**: agronomic query -> prompt -> inference -> advice
//! - **Session gate**: token-keyed sessions over injected credentials
//! - **Sensors**: simulated readings shared between dashboard and reports

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod i18n;
pub mod recommend;
pub mod sensors;
pub mod session;
pub mod types;

// Re-export configuration
pub use config::AppConfig;

// Re-export commonly used types
pub use types::{
    Coordinates, CropType, Location, Recommendation, SensorSample, SettingsUpdate, SoilType,
    TelemetryEvent, UserQuery, WeatherReading,
};

// Re-export error taxonomy
pub use error::{Error, Result};

// Re-export clients and orchestration
pub use clients::{GeoLocator, InferenceClient, RetryPolicy, TelemetrySink, WeatherClient};
pub use recommend::{RecommendationOrchestrator, AGRONOMY_PERSONA};

// Re-export session gate
pub use session::{CredentialProvider, Session, SessionStore, StaticCredentials};
