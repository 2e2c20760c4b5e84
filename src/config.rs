//! Per-sensor configuration values and their validation rules.
//!
//! Each sensor owns one immutable config created at setup time. Validation
//! happens here, before any network call: a config that fails `validate()`
//! never reaches the refresh path.

use crate::error::{AppError, Result};

/// Default hours between current-conditions calls.
pub const DEFAULT_INTERVAL_HOURS: u32 = 1;
/// Default hours between forecast calls.
pub const DEFAULT_FORECAST_INTERVAL_HOURS: u32 = 6;
/// Default length of the requested air quality forecast window, in hours.
pub const DEFAULT_FORECAST_LENGTH_HOURS: u32 = 48;

const MAX_INTERVAL_HOURS: u32 = 24;
const MAX_FORECAST_LENGTH_HOURS: u32 = 96;

/// Configuration for one air quality sensor.
#[derive(Debug, Clone)]
pub struct AirQualityConfig {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Hours between current-conditions calls (1..=24).
    pub interval_hours: u32,
    /// Hours between forecast calls (1..=24).
    pub forecast_interval_hours: u32,
    /// Length of the requested forecast window in hours (1..=96).
    pub forecast_length_hours: u32,
    /// Whether pollutant sources/effects text is kept in the snapshot.
    pub include_additional_info: bool,
}

impl AirQualityConfig {
    pub fn new(api_key: String, latitude: f64, longitude: f64) -> Self {
        Self {
            api_key,
            latitude,
            longitude,
            interval_hours: DEFAULT_INTERVAL_HOURS,
            forecast_interval_hours: DEFAULT_FORECAST_INTERVAL_HOURS,
            forecast_length_hours: DEFAULT_FORECAST_LENGTH_HOURS,
            include_additional_info: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_range("interval", self.interval_hours, MAX_INTERVAL_HOURS)?;
        check_range(
            "forecast_interval",
            self.forecast_interval_hours,
            MAX_INTERVAL_HOURS,
        )?;
        check_range(
            "forecast_length",
            self.forecast_length_hours,
            MAX_FORECAST_LENGTH_HOURS,
        )?;
        Ok(())
    }
}

/// Configuration for one pollen sensor.
///
/// The pollen API only has a forecast stream, so there is no current-conditions
/// interval and no forecast length (the request window is a fixed 5 days).
#[derive(Debug, Clone)]
pub struct PollenConfig {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Hours between forecast calls (1..=24).
    pub forecast_interval_hours: u32,
}

impl PollenConfig {
    pub fn new(api_key: String, latitude: f64, longitude: f64) -> Self {
        Self {
            api_key,
            latitude,
            longitude,
            forecast_interval_hours: DEFAULT_FORECAST_INTERVAL_HOURS,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_range(
            "forecast_interval",
            self.forecast_interval_hours,
            MAX_INTERVAL_HOURS,
        )
    }
}

fn check_range(name: &str, value: u32, max: u32) -> Result<()> {
    if value < 1 || value > max {
        return Err(AppError::Config(format!(
            "{} must be between 1 and {}, got {}",
            name, max, value
        )));
    }
    Ok(())
}
