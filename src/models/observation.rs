//! Normalized weather observations shared by the forecast and historical sources
//!
//! The JSON shape (`main`, `weather`, `wind`, `list`) is what the lookup endpoints
//! return to the browser.

use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provider does not report pressure; a standard atmosphere is shown instead
pub const PRESSURE_PLACEHOLDER: f64 = 1013.0;
/// Metres
pub const VISIBILITY_PLACEHOLDER: f64 = 10000.0;
pub const DEFAULT_ICON: &str = "01d";

/// Result of resolving free text to coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    /// Canonical address as returned by the provider
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

impl Condition {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            icon: DEFAULT_ICON.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Wind {
    pub speed: Option<f64>,
}

/// Snapshot of conditions "now" (or at the start of a historical range)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentConditions {
    pub main: CurrentMain,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub visibility: f64,
}

impl CurrentConditions {
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EntryMain {
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<f64>,
}

/// One hourly reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastEntry {
    /// Unix timestamp
    pub dt: i64,
    pub main: EntryMain,
    pub weather: Vec<Condition>,
}

impl ForecastEntry {
    /// Build an entry from a single hourly reading given in server-local wall-clock time
    pub fn from_reading(
        time: NaiveDateTime,
        temperature: Option<f64>,
        humidity: Option<f64>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            dt: local_timestamp(time),
            main: EntryMain {
                temp_min: temperature,
                temp_max: temperature,
                humidity,
            },
            weather: vec![Condition::new(description)],
        }
    }

    /// Calendar date of the reading in the server's local time zone
    pub fn local_date(&self) -> Option<NaiveDate> {
        Local
            .timestamp_opt(self.dt, 0)
            .single()
            .map(|dt| dt.date_naive())
    }

    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or("Unknown")
    }
}

/// Interprets a wall-clock time in the server's zone (UTC when it falls in a DST gap)
pub fn local_timestamp(time: NaiveDateTime) -> i64 {
    Local
        .from_local_datetime(&time)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| time.and_utc().timestamp())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastList {
    pub list: Vec<ForecastEntry>,
}

/// Uniform output of both weather modes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservations {
    pub current: CurrentConditions,
    pub forecast: ForecastList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LookupLocation {
    /// Present when the location was geocoded from text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Response of the weather lookup endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherLookup {
    pub current: CurrentConditions,
    pub forecast: ForecastList,
    pub location: LookupLocation,
}

impl WeatherLookup {
    pub fn new(observations: WeatherObservations, location: LookupLocation) -> Self {
        Self {
            current: observations.current,
            forecast: observations.forecast,
            location,
        }
    }
}
