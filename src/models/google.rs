//! Deserialization structs for the Google Air Quality and Pollen API responses.
//!
//! Every field that the upstream schema may omit is an `Option`; the
//! normalizers in `crate::sensor` decide how absence maps into snapshot
//! state. Structs derive `Serialize` as well so tests can build mock
//! response bodies from them directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Response body of `POST /v1/currentConditions:lookup` (air quality API).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentConditionsResponse {
    pub date_time: Option<String>,
    pub region_code: Option<String>,
    pub indexes: Option<Vec<AqiIndexInfo>>,
    pub pollutants: Option<Vec<PollutantInfo>>,
}

impl CurrentConditionsResponse {
    /// True when the response carries no data at all (e.g. a literal `{}`
    /// body). The current-conditions normalizer treats this as a no-op.
    pub fn is_empty(&self) -> bool {
        self.date_time.is_none()
            && self.region_code.is_none()
            && self.indexes.is_none()
            && self.pollutants.is_none()
    }
}

/// One entry of an `indexes` array, shared by the current-conditions and
/// forecast responses.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AqiIndexInfo {
    pub code: String,
    pub display_name: Option<String>,
    pub aqi: Option<i64>,
    pub category: Option<String>,
    pub dominant_pollutant: Option<String>,
}

/// One entry of the current-conditions `pollutants` array.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollutantInfo {
    pub code: String,
    pub display_name: Option<String>,
    pub full_name: Option<String>,
    pub concentration: Option<Concentration>,
    pub additional_info: Option<PollutantAdditionalInfo>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Concentration {
    pub value: Option<f64>,
    pub units: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PollutantAdditionalInfo {
    pub sources: Option<String>,
    pub effects: Option<String>,
}

/// Response body of `POST /v1/forecast:lookup` (air quality API).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AirForecastResponse {
    pub hourly_forecasts: Option<Vec<HourlyForecast>>,
    pub region_code: Option<String>,
}

/// One hourly slot of the air quality forecast.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HourlyForecast {
    pub date_time: Option<String>,
    pub indexes: Option<Vec<AqiIndexInfo>>,
}

/// Response body of `GET /v1/forecast:lookup` (pollen API).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollenForecastResponse {
    pub region_code: Option<String>,
    pub daily_info: Option<Vec<DailyPollenInfo>>,
}

/// One day of the pollen forecast.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyPollenInfo {
    pub date: Option<PollenDate>,
    pub pollen_type_info: Option<Vec<PollenTypeInfo>>,
}

/// Calendar date as the pollen API encodes it.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct PollenDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl fmt::Display for PollenDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// One entry of a day's `pollenTypeInfo` array (codes `GRASS`, `TREE`, `WEED`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollenTypeInfo {
    pub code: String,
    pub display_name: Option<String>,
    pub index_info: Option<PollenIndexInfo>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollenIndexInfo {
    pub value: Option<f64>,
    pub category: Option<String>,
}
