//! Simulated irrigation sensor readings
//!
//! There is no field hardware in this deployment; the dashboard and reports
//! views run on a synthetic series regenerated per dashboard render. Reports
//! reads the same stored series the dashboard produced, so both views agree
//! on the data they show.

use chrono::{Duration, Utc};
use rand::Rng;

use crate::types::SensorSample;

/// Default number of samples per generated series.
pub const DEFAULT_SERIES_LEN: usize = 20;

/// Generate a series of per-second sensor samples ending now.
pub fn generate_series(len: usize) -> Vec<SensorSample> {
    let mut rng = rand::thread_rng();
    let start = Utc::now() - Duration::seconds(len as i64);

    (0..len)
        .map(|i| SensorSample {
            timestamp: start + Duration::seconds(i as i64),
            soil_moisture: rng.gen_range(20..=80),
            temperature: rng.gen_range(15..=40),
            humidity: rng.gen_range(30..=90),
            water_flow: rng.gen_range(10..=50),
            ph_level: (rng.gen_range(5.5_f64..=8.5) * 100.0).round() / 100.0,
        })
        .collect()
}

/// Render a series as CSV for the reports download.
pub fn series_to_csv(series: &[SensorSample]) -> String {
    let mut csv =
        String::from("timestamp,soil_moisture,temperature,humidity,water_flow,ph_level\n");
    for sample in series {
        csv.push_str(&format!(
            "{},{},{},{},{},{:.2}\n",
            sample.timestamp.to_rfc3339(),
            sample.soil_moisture,
            sample.temperature,
            sample.humidity,
            sample.water_flow,
            sample.ph_level
        ));
    }
    csv
}
