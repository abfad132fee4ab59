//! Open-Meteo weather source
//!
//! Transport lives in [`OpenMeteoClient`]; the payload types and the `adapt_*`
//! functions turn either endpoint's response into the same [`WeatherObservations`].

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    config::WeatherConfig,
    error::{AppError, AppResult},
    models::observation::{
        Condition, CurrentConditions, CurrentMain, ForecastEntry, ForecastList,
        WeatherObservations, Wind, PRESSURE_PLACEHOLDER, VISIBILITY_PLACEHOLDER,
    },
};

/// Forecast horizon requested from the provider, in days
pub const FORECAST_DAYS: u32 = 5;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,weather_code,wind_speed_10m";
const FORECAST_HOURLY_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,precipitation_probability,weather_code";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_probability_max";
const ARCHIVE_HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code";

/// Substituted when the archive has no humidity for an hour
pub const DEFAULT_HUMIDITY: f64 = 50.0;
const DEFAULT_TEMPERATURE: f64 = 20.0;
const DEFAULT_WIND_SPEED: f64 = 5.0;

/// Source of normalized weather observations for a pair of coordinates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions plus the hourly forecast
    async fn forecast(&self, latitude: f64, longitude: f64) -> AppResult<WeatherObservations>;

    /// Hourly observations between two dates (inclusive)
    async fn historical(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<WeatherObservations>;
}

/// Human-readable description for a WMO weather interpretation code
pub fn describe_weather_code(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

fn describe(code: Option<i64>) -> &'static str {
    code.map(describe_weather_code).unwrap_or("Unknown")
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CurrentBlock {
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub weather_code: Option<i64>,
    pub wind_speed_10m: Option<f64>,
}

/// Column-oriented hourly block; columns may be shorter than `time`
#[derive(Debug, Default, Deserialize)]
pub struct HourlyBlock {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub weather_code: Vec<Option<i64>>,
}

impl HourlyBlock {
    fn temperature(&self, i: usize) -> Option<f64> {
        self.temperature_2m.get(i).copied().flatten()
    }

    fn humidity(&self, i: usize) -> Option<f64> {
        self.relative_humidity_2m.get(i).copied().flatten()
    }

    fn weather_code(&self, i: usize) -> Option<i64> {
        self.weather_code.get(i).copied().flatten()
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub current: Option<CurrentBlock>,
    pub hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    pub hourly: Option<HourlyBlock>,
}

/// Error body returned by Open-Meteo with a 4xx status
#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// Open-Meteo returns local wall-clock times such as `2024-05-01T13:00`
fn parse_hour(raw: &str) -> AppResult<NaiveDateTime> {
    let trimmed = raw.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| AppError::Upstream(format!("Invalid time value in weather data: {}", raw)))
}

// ---------------------------------------------------------------------------
// Shape adapters
// ---------------------------------------------------------------------------

/// Forecast payload: every hourly slot becomes an entry, nulls kept as-is
pub fn adapt_forecast(payload: ForecastResponse) -> AppResult<WeatherObservations> {
    let current = payload
        .current
        .ok_or_else(|| AppError::Upstream("Weather data is missing current conditions".to_string()))?;
    let hourly = payload
        .hourly
        .ok_or_else(|| AppError::Upstream("Weather data is missing hourly forecast".to_string()))?;

    let mut list = Vec::with_capacity(hourly.time.len());
    for (i, time) in hourly.time.iter().enumerate() {
        list.push(ForecastEntry::from_reading(
            parse_hour(time)?,
            hourly.temperature(i),
            hourly.humidity(i),
            describe(hourly.weather_code(i)),
        ));
    }

    Ok(WeatherObservations {
        current: CurrentConditions {
            main: CurrentMain {
                temp: current.temperature_2m,
                feels_like: current.apparent_temperature,
                humidity: current.relative_humidity_2m,
                pressure: PRESSURE_PLACEHOLDER,
            },
            weather: vec![Condition::new(describe(current.weather_code))],
            wind: Wind {
                speed: current.wind_speed_10m,
            },
            visibility: VISIBILITY_PLACEHOLDER,
        },
        forecast: ForecastList { list },
    })
}

/// Archive payload: hours without a temperature are skipped, missing humidity
/// becomes [`DEFAULT_HUMIDITY`], and "current" is taken from the first reading
pub fn adapt_archive(payload: ArchiveResponse) -> AppResult<WeatherObservations> {
    let hourly = payload.hourly.ok_or_else(|| {
        AppError::Upstream("No hourly weather data available from historical API".to_string())
    })?;

    let mut list = Vec::with_capacity(hourly.time.len());
    for (i, time) in hourly.time.iter().enumerate() {
        let Some(temperature) = hourly.temperature(i) else {
            continue;
        };
        list.push(ForecastEntry::from_reading(
            parse_hour(time)?,
            Some(temperature),
            Some(hourly.humidity(i).unwrap_or(DEFAULT_HUMIDITY)),
            describe(hourly.weather_code(i)),
        ));
    }

    let first = list.first();
    let temp = first
        .and_then(|e| e.main.temp_min)
        .unwrap_or(DEFAULT_TEMPERATURE);
    let current = CurrentConditions {
        main: CurrentMain {
            temp: Some(temp),
            feels_like: Some(temp),
            humidity: Some(
                first
                    .and_then(|e| e.main.humidity)
                    .unwrap_or(DEFAULT_HUMIDITY),
            ),
            pressure: PRESSURE_PLACEHOLDER,
        },
        weather: vec![Condition::new(
            first.map(|e| e.description()).unwrap_or("Unknown"),
        )],
        wind: Wind {
            speed: Some(DEFAULT_WIND_SPEED),
        },
        visibility: VISIBILITY_PLACEHOLDER,
    };

    Ok(WeatherObservations {
        current,
        forecast: ForecastList { list },
    })
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Open-Meteo forecast and archive APIs
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    forecast_url: String,
    archive_url: String,
}

impl OpenMeteoClient {
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            forecast_url: config.forecast_url.clone(),
            archive_url: config.archive_url.clone(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> AppResult<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Weather API request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Weather API request failed: {}", e)))?;

        if let Ok(err) = serde_json::from_str::<ProviderError>(&body) {
            if err.error {
                let reason = err.reason.unwrap_or_else(|| status.to_string());
                return Err(AppError::Upstream(format!("Weather API error: {}", reason)));
            }
        }
        if !status.is_success() {
            return Err(AppError::Upstream(format!("Weather API error: HTTP {}", status)));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::Upstream(format!("Invalid weather data: {}", e)))
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn forecast(&self, latitude: f64, longitude: f64) -> AppResult<WeatherObservations> {
        tracing::debug!("Fetching forecast for {},{}", latitude, longitude);
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("hourly", FORECAST_HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("forecast_days", FORECAST_DAYS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        let payload: ForecastResponse = self.fetch(&self.forecast_url, &query).await?;
        adapt_forecast(payload)
    }

    async fn historical(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<WeatherObservations> {
        tracing::debug!(
            "Fetching history for {},{} from {} to {}",
            latitude,
            longitude,
            start_date,
            end_date
        );
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("start_date", start_date.format("%Y-%m-%d").to_string()),
            ("end_date", end_date.format("%Y-%m-%d").to_string()),
            ("hourly", ARCHIVE_HOURLY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        let payload: ArchiveResponse = self.fetch(&self.archive_url, &query).await?;
        adapt_archive(payload)
    }
}
