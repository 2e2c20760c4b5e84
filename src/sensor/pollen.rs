//! The pollen sensor: single-stream version of the refresh machine.

use crate::api::GoogleApiClient;
use crate::config::PollenConfig;
use crate::error::Result;
use crate::models::{CallStatus, DailyPollenInfo, PollenForecastEntry, PollenForecastResponse, PollenSnapshot};
use crate::sensor::gate;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, warn};

const GRASS: &str = "GRASS";
const TREE: &str = "TREE";
const WEED: &str = "WEED";

/// Polls the Google Pollen API and exposes the latest normalized state.
#[derive(Debug)]
pub struct PollenSensor {
    config: PollenConfig,
    client: GoogleApiClient,
    snapshot: PollenSnapshot,
}

impl PollenSensor {
    /// Creates a sensor from a validated configuration.
    pub fn new(config: PollenConfig) -> Result<Self> {
        config.validate()?;
        let client = GoogleApiClient::new(config.api_key.clone())?;
        Ok(Self {
            config,
            client,
            snapshot: PollenSnapshot::default(),
        })
    }

    /// Creates a sensor with a caller-supplied client (custom base URLs).
    pub fn with_client(config: PollenConfig, client: GoogleApiClient) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            snapshot: PollenSnapshot::default(),
        })
    }

    /// The latest normalized state.
    pub fn snapshot(&self) -> &PollenSnapshot {
        &self.snapshot
    }

    /// Runs one refresh tick at instant `now`. The forecast stream is the
    /// only stream here; when it is not due the tick only re-stamps
    /// `next_call_due_at`.
    pub async fn refresh(&mut self, now: DateTime<Utc>) {
        let interval = Duration::hours(i64::from(self.config.forecast_interval_hours));
        self.snapshot.forecast_timing.next_call_due_at = Some(now + interval);

        if !gate::should_call(
            now,
            self.snapshot.forecast_timing.last_call_at,
            self.config.forecast_interval_hours,
        ) {
            debug!("Pollen forecast not due; skipping call");
            return;
        }

        let result = self
            .client
            .pollen_forecast(self.config.latitude, self.config.longitude)
            .await;
        self.commit(now, result);
    }

    fn commit(&mut self, now: DateTime<Utc>, result: Result<PollenForecastResponse>) {
        match result {
            Ok(data) => {
                self.apply_forecast(data);
                self.snapshot.forecast_status = CallStatus::Successful;
                self.snapshot.forecast_timing.last_call_at = Some(now);
            },
            Err(e) => {
                error!("Pollen forecast call failed: {}", e);
                self.snapshot.forecast_status = CallStatus::Error;
            },
        }
    }

    /// Rebuilds the daily forecast; the first day doubles as today's levels.
    /// A response without `dailyInfo` clears the forecast.
    fn apply_forecast(&mut self, data: PollenForecastResponse) {
        let Some(days) = data.daily_info else {
            warn!("Received empty pollen forecast data; clearing forecast");
            self.snapshot.forecast.clear();
            return;
        };

        self.snapshot.forecast = days
            .iter()
            .map(|day| PollenForecastEntry {
                date: day.date.map(|d| d.to_string()),
                grass: pollen_value(day, GRASS),
                tree: pollen_value(day, TREE),
                weed: pollen_value(day, WEED),
            })
            .collect();
        self.snapshot.today = self.snapshot.forecast.first().cloned();
    }
}

/// First-or-absent lookup of one pollen type in a day's `pollenTypeInfo`.
/// Absent codes and absent index values both map to `None`.
fn pollen_value(day: &DailyPollenInfo, code: &str) -> Option<f64> {
    day.pollen_type_info
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|p| p.code == code)
        .and_then(|p| p.index_info.as_ref())
        .and_then(|i| i.value)
}
