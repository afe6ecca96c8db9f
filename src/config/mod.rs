//! Application configuration — TOML file, environment variables, defaults
//!
//! ## Loading Order
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config` flag, `IRRIGOS_CONFIG` env var, or `irrigos.toml`
//!    in the working directory)
//! 3. Environment variable overrides for secrets
//!
//! Secrets (inference API key, telemetry write key, login credentials) are
//! never compiled into the binary. The inference key is required: a missing
//! key is a fatal startup condition and the process must not serve requests
//! without it.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::Error;

/// Environment variable holding the inference service API key.
pub const INFERENCE_API_KEY_ENV: &str = "IRRIGOS_INFERENCE_API_KEY";

/// Environment variable holding the telemetry channel write key.
pub const TELEMETRY_WRITE_KEY_ENV: &str = "IRRIGOS_TELEMETRY_WRITE_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub inference: InferenceConfig,
    pub weather: WeatherConfig,
    pub telemetry: TelemetryConfig,
    pub geolocation: GeolocationConfig,
    pub auth: AuthConfig,
    pub http: HttpConfig,
    pub locale: LocaleConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Chat-completion endpoint base URL
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Bearer API key. Loaded from env, never from source.
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Forecast API base URL
    pub base_url: String,
    /// Fallback coordinates when IP geolocation fails
    pub default_latitude: f64,
    pub default_longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Telemetry channel base URL
    pub base_url: String,
    /// Channel write key. Empty means telemetry pushes are rejected
    /// with MissingConfiguration rather than sent unauthenticated.
    pub write_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// IP-geolocation lookup base URL
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

/// Outbound HTTP behavior shared by all clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds. Every outbound call is bounded.
    pub timeout_secs: u64,
    /// Bounded retries for transient transport errors (0 = single attempt)
    pub max_retries: u32,
    /// Base backoff in milliseconds, doubled per attempt
    pub backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Fallback locale for catalog lookups
    pub default_locale: String,
    /// Optional TOML catalog file merged over the built-in strings
    pub catalog_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "mixtral-8x7b-32768".to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com".to_string(),
            default_latitude: 11.0168,
            default_longitude: 76.9558,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.thingspeak.com".to_string(),
            write_key: String::new(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://ip-api.com".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_retries: 2,
            backoff_ms: 500,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            catalog_path: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            inference: InferenceConfig::default(),
            weather: WeatherConfig::default(),
            telemetry: TelemetryConfig::default(),
            geolocation: GeolocationConfig::default(),
            auth: AuthConfig::default(),
            http: HttpConfig::default(),
            locale: LocaleConfig::default(),
        }
    }
}

impl HttpConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub const fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl AppConfig {
    /// Load configuration: file (if any), then env overrides for secrets.
    pub fn load(config_path: Option<&str>) -> Result<Self, Error> {
        let mut config = Self::load_file(config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file(config_path: Option<&str>) -> Result<Self, Error> {
        let env_path = std::env::var("IRRIGOS_CONFIG").ok();
        let candidate = config_path
            .map(str::to_string)
            .or(env_path)
            .unwrap_or_else(|| "irrigos.toml".to_string());

        if !Path::new(&candidate).exists() {
            if config_path.is_some() {
                // An explicitly named file that does not exist is a startup error.
                return Err(Error::MissingConfiguration(format!(
                    "config file not found: {candidate}"
                )));
            }
            info!("No config file found, using built-in defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&candidate).map_err(|e| {
            Error::MissingConfiguration(format!("cannot read {candidate}: {e}"))
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| {
            Error::MissingConfiguration(format!("cannot parse {candidate}: {e}"))
        })?;
        info!(path = %candidate, "Loaded configuration file");
        Ok(config)
    }

    /// Env vars win over file values for secrets.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(INFERENCE_API_KEY_ENV) {
            self.inference.api_key = key;
        }
        if let Ok(key) = std::env::var(TELEMETRY_WRITE_KEY_ENV) {
            self.telemetry.write_key = key;
        }
        if let Ok(user) = std::env::var("IRRIGOS_AUTH_USERNAME") {
            self.auth.username = user;
        }
        if let Ok(pass) = std::env::var("IRRIGOS_AUTH_PASSWORD") {
            self.auth.password = pass;
        }

        if self.auth.username.is_empty() || self.auth.password.is_empty() {
            warn!(
                "Login credentials not configured, using default dev credentials — do NOT use in production"
            );
            self.auth.username = "admin".to_string();
            self.auth.password = "password".to_string();
        }
    }

    /// Validate startup requirements. The inference key is mandatory; the
    /// process must not serve requests without it.
    pub fn validate(&self) -> Result<(), Error> {
        if self.inference.api_key.is_empty() {
            return Err(Error::MissingConfiguration(format!(
                "inference API key not set ({INFERENCE_API_KEY_ENV})"
            )));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::MissingConfiguration(
                "http.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.telemetry.write_key.is_empty() {
            warn!(
                "Telemetry write key not set ({TELEMETRY_WRITE_KEY_ENV}) — status pushes will be rejected"
            );
        }
        Ok(())
    }
}
