//! The air quality sensor: two-stream refresh orchestrator plus normalizers.
//!
//! One instance owns the current-conditions stream and the forecast stream.
//! Each tick re-stamps both `next_call_due_at` values, gates each stream
//! independently, runs the due calls concurrently, and commits the results.
//! A failed call only flips that stream's status to `error`; the previous
//! snapshot data stays in place and `last_call_at` is not stamped, so the
//! next tick retries immediately.

use crate::api::GoogleApiClient;
use crate::config::AirQualityConfig;
use crate::error::Result;
use crate::models::{
    AirForecastResponse, AirQualityIndex, AirQualitySnapshot, AqiForecastEntry, CallStatus,
    CurrentConditionsResponse, Pollutant,
};
use crate::sensor::gate;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, warn};

/// Index code of the Universal AQI, the scale forecast entries are read from.
const UNIVERSAL_AQI_CODE: &str = "uaqi";

/// Polls the Google Air Quality API and exposes the latest normalized state.
#[derive(Debug)]
pub struct AirQualitySensor {
    config: AirQualityConfig,
    client: GoogleApiClient,
    snapshot: AirQualitySnapshot,
}

impl AirQualitySensor {
    /// Creates a sensor from a validated configuration.
    pub fn new(config: AirQualityConfig) -> Result<Self> {
        config.validate()?;
        let client = GoogleApiClient::new(config.api_key.clone())?;
        Ok(Self {
            config,
            client,
            snapshot: AirQualitySnapshot::default(),
        })
    }

    /// Creates a sensor with a caller-supplied client (custom base URLs).
    pub fn with_client(config: AirQualityConfig, client: GoogleApiClient) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            snapshot: AirQualitySnapshot::default(),
        })
    }

    /// The latest normalized state.
    pub fn snapshot(&self) -> &AirQualitySnapshot {
        &self.snapshot
    }

    /// Runs one refresh tick at instant `now`.
    ///
    /// Both streams recompute their next-due timestamp unconditionally; due
    /// streams are fetched concurrently, so the tick lasts as long as the
    /// slower of the two calls rather than their sum.
    pub async fn refresh(&mut self, now: DateTime<Utc>) {
        let interval = Duration::hours(i64::from(self.config.interval_hours));
        let forecast_interval = Duration::hours(i64::from(self.config.forecast_interval_hours));
        self.snapshot.current_timing.next_call_due_at = Some(now + interval);
        self.snapshot.forecast_timing.next_call_due_at = Some(now + forecast_interval);

        let current_due = gate::should_call(
            now,
            self.snapshot.current_timing.last_call_at,
            self.config.interval_hours,
        );
        let forecast_due = gate::should_call(
            now,
            self.snapshot.forecast_timing.last_call_at,
            self.config.forecast_interval_hours,
        );
        debug!(
            "Air quality tick: current_due={}, forecast_due={}",
            current_due, forecast_due
        );

        let client = &self.client;
        let (latitude, longitude) = (self.config.latitude, self.config.longitude);
        let length_hours = self.config.forecast_length_hours;

        let current_call = async {
            if current_due {
                Some(client.current_conditions(latitude, longitude).await)
            } else {
                None
            }
        };
        let forecast_call = async {
            if forecast_due {
                Some(client.air_forecast(latitude, longitude, now, length_hours).await)
            } else {
                None
            }
        };

        let (current_result, forecast_result) = tokio::join!(current_call, forecast_call);

        if let Some(result) = current_result {
            self.commit_current(now, result);
        }
        if let Some(result) = forecast_result {
            self.commit_forecast(now, result);
        }
    }

    fn commit_current(&mut self, now: DateTime<Utc>, result: Result<CurrentConditionsResponse>) {
        match result {
            Ok(data) => {
                self.apply_current(data);
                self.snapshot.current_status = CallStatus::Successful;
                self.snapshot.current_timing.last_call_at = Some(now);
            },
            Err(e) => {
                error!("Current conditions call failed: {}", e);
                self.snapshot.current_status = CallStatus::Error;
            },
        }
    }

    fn commit_forecast(&mut self, now: DateTime<Utc>, result: Result<AirForecastResponse>) {
        match result {
            Ok(data) => {
                self.apply_forecast(data);
                self.snapshot.forecast_status = CallStatus::Successful;
                self.snapshot.forecast_timing.last_call_at = Some(now);
            },
            Err(e) => {
                error!("Air quality forecast call failed: {}", e);
                self.snapshot.forecast_status = CallStatus::Error;
            },
        }
    }

    /// Rebuilds the pollutant map and index list from a current-conditions
    /// response. An entirely empty response is a no-op: the previous state
    /// stays in place rather than being cleared.
    fn apply_current(&mut self, data: CurrentConditionsResponse) {
        if data.is_empty() {
            warn!("Received empty current conditions data; keeping previous state");
            return;
        }

        self.snapshot.indices = data
            .indexes
            .unwrap_or_default()
            .into_iter()
            .map(|i| AirQualityIndex {
                code: i.code,
                aqi: i.aqi,
                category: i.category,
                dominant_pollutant: i.dominant_pollutant,
            })
            .collect();
        self.snapshot.region = data.region_code;
        self.snapshot.last_update = data.date_time;

        self.snapshot.pollutants = data
            .pollutants
            .unwrap_or_default()
            .into_iter()
            .map(|p| {
                let concentration = p.concentration.unwrap_or_default();
                let additional = p.additional_info.unwrap_or_default();
                let (sources, effects) = if self.config.include_additional_info {
                    (additional.sources, additional.effects)
                } else {
                    (None, None)
                };
                let pollutant = Pollutant {
                    code: p.code.clone(),
                    value: concentration.value.unwrap_or_default(),
                    units: concentration.units.unwrap_or_default(),
                    sources,
                    effects,
                };
                (p.code, pollutant)
            })
            .collect();

        // Primary value follows pm25 when present, else keeps its last value.
        if let Some(pm25) = self.snapshot.pollutants.get("pm25") {
            self.snapshot.pm25 = Some(pm25.value);
        }
    }

    /// Rebuilds the hourly forecast. A response without `hourlyForecasts`
    /// clears the forecast, unlike the current-conditions no-op.
    fn apply_forecast(&mut self, data: AirForecastResponse) {
        let Some(hours) = data.hourly_forecasts else {
            warn!("Received empty air quality forecast data; clearing forecast");
            self.snapshot.forecast.clear();
            return;
        };

        self.snapshot.forecast = hours
            .into_iter()
            .map(|slot| {
                let uaqi = slot
                    .indexes
                    .unwrap_or_default()
                    .into_iter()
                    .find(|i| i.code == UNIVERSAL_AQI_CODE);
                AqiForecastEntry {
                    datetime: slot.date_time,
                    aqi: uaqi.as_ref().and_then(|i| i.aqi),
                    dominant_pollutant: uaqi.and_then(|i| i.dominant_pollutant),
                }
            })
            .collect();
    }
}
