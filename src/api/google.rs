//! Provides a client for the Google Air Quality and Pollen REST APIs.
//!
//! One client instance serves both APIs; the three calls here map one-to-one
//! onto the upstream endpoints. All failures come back as typed errors:
//! a non-2xx status turns into [`AppError::UpstreamStatus`] with the body
//! text attached, everything below HTTP into [`AppError::Transport`].

use crate::error::{AppError, Result};
use crate::models::{AirForecastResponse, CurrentConditionsResponse, PollenForecastResponse};
use chrono::{DateTime, Duration, Timelike, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error, info};

const AIR_QUALITY_BASE_URL: &str = "https://airquality.googleapis.com";
const POLLEN_BASE_URL: &str = "https://pollen.googleapis.com";

/// Upper bound per call; a hung upstream stalls the tick at most this long.
const CALL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// The pollen API is always queried for a fixed 5-day window.
const POLLEN_FORECAST_DAYS: u32 = 5;

/// An asynchronous client for the Google Air Quality and Pollen APIs.
#[derive(Debug, Clone)]
pub struct GoogleApiClient {
    client: Client,
    api_key: String,
    air_base_url: String,
    pollen_base_url: String,
}

impl GoogleApiClient {
    /// Creates a new client with the provided API key, using the production
    /// Google endpoints.
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_urls(api_key, AIR_QUALITY_BASE_URL, POLLEN_BASE_URL)
    }

    /// Creates a new client with custom base URLs.
    ///
    /// This is primarily intended for testing against a mock server.
    pub fn with_base_urls(
        api_key: String,
        air_base_url: &str,
        pollen_base_url: &str,
    ) -> Result<Self> {
        let client = Client::builder().timeout(CALL_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            air_base_url: air_base_url.trim_end_matches('/').to_string(),
            pollen_base_url: pollen_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches current air quality conditions for a location.
    ///
    /// Corresponds to `POST /v1/currentConditions:lookup`.
    pub async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditionsResponse> {
        info!(
            "Fetching current air quality for ({}, {})",
            latitude, longitude
        );

        let url = format!("{}/v1/currentConditions:lookup", self.air_base_url);
        let payload = json!({
            "location": {"latitude": latitude, "longitude": longitude},
            "extraComputations": [
                "HEALTH_RECOMMENDATIONS",
                "LOCAL_AQI",
                "POLLUTANT_ADDITIONAL_INFO",
                "DOMINANT_POLLUTANT_CONCENTRATION",
                "POLLUTANT_CONCENTRATION",
            ],
        });

        let request = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&payload);

        self.execute("currentConditions:lookup", request).await
    }

    /// Fetches the hourly air quality forecast for a location.
    ///
    /// Corresponds to `POST /v1/forecast:lookup` on the air quality API.
    /// The requested window starts at the next full hour after `now` and
    /// spans `length_hours` hours.
    pub async fn air_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        now: DateTime<Utc>,
        length_hours: u32,
    ) -> Result<AirForecastResponse> {
        let start = next_full_hour(now);
        let end = start + Duration::hours(i64::from(length_hours));

        info!(
            "Fetching air quality forecast for ({}, {}) from {} to {}",
            latitude,
            longitude,
            format_utc(start),
            format_utc(end)
        );

        let url = format!("{}/v1/forecast:lookup", self.air_base_url);
        let payload = json!({
            "universalAqi": "true",
            "location": {
                "latitude": latitude.to_string(),
                "longitude": longitude.to_string(),
            },
            "period": {
                "startTime": format_utc(start),
                "endTime": format_utc(end),
            },
            "languageCode": "en",
            "extraComputations": [
                "HEALTH_RECOMMENDATIONS",
                "DOMINANT_POLLUTANT_CONCENTRATION",
                "POLLUTANT_ADDITIONAL_INFO",
            ],
            "uaqiColorPalette": "RED_GREEN",
        });

        let request = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&payload);

        self.execute("forecast:lookup", request).await
    }

    /// Fetches the 5-day pollen forecast for a location.
    ///
    /// Corresponds to `GET /v1/forecast:lookup` on the pollen API.
    pub async fn pollen_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<PollenForecastResponse> {
        info!("Fetching pollen forecast for ({}, {})", latitude, longitude);

        let url = format!("{}/v1/forecast:lookup", self.pollen_base_url);
        let request = self.client.get(&url).query(&[
            ("key", self.api_key.clone()),
            ("location.latitude", latitude.to_string()),
            ("location.longitude", longitude.to_string()),
            ("days", POLLEN_FORECAST_DAYS.to_string()),
        ]);

        self.execute("pollen forecast:lookup", request).await
    }

    /// Sends a prepared request and decodes the JSON body, mapping every
    /// failure mode into a typed `AppError`.
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            error!("Request to {} failed: {}", endpoint, e);
            AppError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = truncate_body(&body);
            error!("{} returned HTTP {}: {}", endpoint, status, body);
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response.json::<T>().await.map_err(|e| {
            error!("Failed to decode {} response: {}", endpoint, e);
            AppError::from(e)
        })?;

        debug!("Decoded {} response", endpoint);
        Ok(parsed)
    }
}

/// Rounds `now` up to the next full hour. An instant exactly on the hour
/// still advances, matching "align the forecast start with the next hour".
fn next_full_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let t = now + Duration::hours(1);
    t - Duration::minutes(i64::from(t.minute()))
        - Duration::seconds(i64::from(t.second()))
        - Duration::nanoseconds(i64::from(t.nanosecond()))
}

/// RFC3339 with a literal `Z` suffix and no sub-second part, the format the
/// forecast endpoint expects in `period`.
fn format_utc(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Caps an error body for logs and error values. Cuts on a char boundary,
/// never mid-codepoint.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn next_full_hour_rounds_up() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 17, 23).unwrap();
        let rounded = next_full_hour(now);
        assert_eq!(rounded, Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap());
    }

    #[test]
    fn next_full_hour_advances_on_exact_hour() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let rounded = next_full_hour(now);
        assert_eq!(rounded, Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap());
    }

    #[test]
    fn format_utc_uses_z_suffix() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        assert_eq!(format_utc(t), "2024-05-01T11:00:00Z");
    }

    #[test]
    fn truncate_body_caps_long_bodies() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        // A multibyte char straddling the cap must not panic the error path.
        let mut body = "x".repeat(199);
        body.push_str("ééé");
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.starts_with(&"x".repeat(199)));

        let short = "héllo".to_string();
        assert_eq!(truncate_body(&short), short);
    }
}
