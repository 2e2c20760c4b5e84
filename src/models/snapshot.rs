//! Normalized per-sensor state: what the host sees when it asks for data.
//!
//! Snapshots are rebuilt wholesale by a successful refresh and left untouched
//! by a failed one, so stale-but-present data survives transient upstream
//! failures. Call timing and status ride along so the host can display when
//! each stream was last (and will next be) polled.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Outcome of the most recent call attempt for one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallStatus {
    #[default]
    Unknown,
    Successful,
    Error,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Unknown => "unknown",
            CallStatus::Successful => "successful",
            CallStatus::Error => "error",
        }
    }
}

/// Call timestamps for one stream.
///
/// `next_call_due_at` is recomputed on every tick whether or not a call
/// fires; `last_call_at` is only stamped when a call succeeds, so a failed
/// stream is retried on the very next tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallTiming {
    pub last_call_at: Option<DateTime<Utc>>,
    pub next_call_due_at: Option<DateTime<Utc>>,
}

/// One pollutant from the current-conditions response.
#[derive(Debug, Clone)]
pub struct Pollutant {
    pub code: String,
    pub value: f64,
    pub units: String,
    /// Only populated when the sensor is configured with `include_additional_info`.
    pub sources: Option<String>,
    pub effects: Option<String>,
}

/// One air quality index (e.g. `uaqi` or a local index) from the
/// current-conditions response.
#[derive(Debug, Clone)]
pub struct AirQualityIndex {
    pub code: String,
    pub aqi: Option<i64>,
    pub category: Option<String>,
    pub dominant_pollutant: Option<String>,
}

/// One hourly slot of the normalized air quality forecast. Both values are
/// `None` when the slot carried no index with code `uaqi`.
#[derive(Debug, Clone)]
pub struct AqiForecastEntry {
    pub datetime: Option<String>,
    pub aqi: Option<i64>,
    pub dominant_pollutant: Option<String>,
}

/// One day of the normalized pollen forecast. Each pollen type is `None`
/// when its code was absent from that day's `pollenTypeInfo`.
#[derive(Debug, Clone)]
pub struct PollenForecastEntry {
    pub date: Option<String>,
    pub grass: Option<f64>,
    pub tree: Option<f64>,
    pub weed: Option<f64>,
}

/// Complete externally visible state of an air quality sensor.
#[derive(Debug, Clone, Default)]
pub struct AirQualitySnapshot {
    /// Primary exposed value: the latest PM2.5 concentration.
    pub pm25: Option<f64>,
    pub pollutants: HashMap<String, Pollutant>,
    pub indices: Vec<AirQualityIndex>,
    pub region: Option<String>,
    /// Upstream `dateTime` of the last current-conditions payload.
    pub last_update: Option<String>,
    pub forecast: Vec<AqiForecastEntry>,
    pub current_timing: CallTiming,
    pub current_status: CallStatus,
    pub forecast_timing: CallTiming,
    pub forecast_status: CallStatus,
}

impl AirQualitySnapshot {
    fn pollutant_value(&self, code: &str) -> Option<f64> {
        self.pollutants.get(code).map(|p| p.value)
    }

    pub fn pm10(&self) -> Option<f64> {
        self.pollutant_value("pm10")
    }

    pub fn carbon_monoxide(&self) -> Option<f64> {
        self.pollutant_value("co")
    }

    pub fn nitrogen_dioxide(&self) -> Option<f64> {
        self.pollutant_value("no2")
    }

    pub fn ozone(&self) -> Option<f64> {
        self.pollutant_value("o3")
    }

    pub fn sulfur_dioxide(&self) -> Option<f64> {
        self.pollutant_value("so2")
    }
}

/// Complete externally visible state of a pollen sensor.
#[derive(Debug, Clone, Default)]
pub struct PollenSnapshot {
    /// First day of the forecast, treated as today's pollen levels.
    pub today: Option<PollenForecastEntry>,
    pub forecast: Vec<PollenForecastEntry>,
    pub forecast_timing: CallTiming,
    pub forecast_status: CallStatus,
}

impl PollenSnapshot {
    /// Fixed sentinel the pollen entity exposes as its primary value.
    pub const STATE: i64 = 1;

    pub fn grass(&self) -> Option<f64> {
        self.today.as_ref().and_then(|t| t.grass)
    }

    pub fn tree(&self) -> Option<f64> {
        self.today.as_ref().and_then(|t| t.tree)
    }

    pub fn weed(&self) -> Option<f64> {
        self.today.as_ref().and_then(|t| t.weed)
    }
}
