//! Core domain types shared across clients, orchestration, and the API layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Agronomic query enums
// ============================================================================

/// Growing region selected by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "Region A")]
    RegionA,
    #[serde(rename = "Region B")]
    RegionB,
    #[serde(rename = "Region C")]
    RegionC,
}

impl Location {
    pub const ALL: [Self; 3] = [Self::RegionA, Self::RegionB, Self::RegionC];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegionA => "Region A",
            Self::RegionB => "Region B",
            Self::RegionC => "Region C",
        }
    }
}

/// Soil classification for the selected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilType {
    Clay,
    Sandy,
    Loamy,
}

impl SoilType {
    pub const ALL: [Self; 3] = [Self::Clay, Self::Sandy, Self::Loamy];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clay => "Clay",
            Self::Sandy => "Sandy",
            Self::Loamy => "Loamy",
        }
    }
}

/// Crop currently planted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropType {
    Wheat,
    Rice,
    Corn,
}

impl CropType {
    pub const ALL: [Self; 3] = [Self::Wheat, Self::Rice, Self::Corn];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wheat => "Wheat",
            Self::Rice => "Rice",
            Self::Corn => "Corn",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request / response payloads
// ============================================================================

/// User-selected agronomic parameters for one recommendation request.
///
/// Constructed per request and discarded after use. No cross-field
/// validation is performed (crop/soil compatibility is the agronomist's
/// problem, not ours).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserQuery {
    pub location: Location,
    pub soil_type: SoilType,
    pub crop_type: CropType,
}

/// Free-form advisory text returned by the inference service. Ephemeral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

/// A single current-temperature reading, fetched fresh per dashboard render.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
}

/// Approximate caller position from the IP-geolocation lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One status value relayed to the telemetry channel. Fire-and-forget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub status_value: u32,
}

/// One simulated sensor sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSample {
    pub timestamp: DateTime<Utc>,
    /// Soil moisture, percent (20-80 in simulation)
    pub soil_moisture: u32,
    /// Air temperature, degrees Celsius (15-40 in simulation)
    pub temperature: u32,
    /// Relative humidity, percent (30-90 in simulation)
    pub humidity: u32,
    /// Water flow, L/min (10-50 in simulation)
    pub water_flow: u32,
    /// Soil pH (5.5-8.5 in simulation, two decimals)
    pub ph_level: f64,
}

/// Settings submitted from the UI shell's settings view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub auto_irrigation: bool,
    /// Soil moisture threshold, percent. Relayed to the telemetry sink.
    pub moisture_threshold: u32,
}
