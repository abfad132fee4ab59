//! Reduction of hourly readings to a record summary over a date range

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{observation::ForecastEntry, record_form::decimal},
};

/// Humidity reported when no reading in range carries one
pub const DEFAULT_HUMIDITY: i32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSummary {
    pub temperature_min: f64,
    pub temperature_max: f64,
    /// Rounded to 2 decimal places
    pub temperature_avg: Decimal,
    pub humidity: i32,
    pub description: String,
}

/// Summarize the entries whose local calendar date falls within `[start, end]`
pub fn aggregate(
    entries: &[ForecastEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<WeatherSummary> {
    let in_range: Vec<&ForecastEntry> = entries
        .iter()
        .filter(|e| {
            e.local_date()
                .map(|d| start <= d && d <= end)
                .unwrap_or(false)
        })
        .collect();

    if in_range.is_empty() {
        return Err(AppError::NoData(
            "No weather data available for the selected date range".to_string(),
        ));
    }

    let temps: Vec<f64> = in_range.iter().filter_map(|e| e.main.temp_min).collect();
    if temps.is_empty() {
        return Err(AppError::NoData(
            "No valid temperature data available for the selected date range".to_string(),
        ));
    }
    let highs: Vec<f64> = in_range.iter().filter_map(|e| e.main.temp_max).collect();

    let temperature_min = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let temperature_max = (if highs.is_empty() { &temps } else { &highs })
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let mean = temps.iter().sum::<f64>() / temps.len() as f64;
    let temperature_avg = decimal(mean, 2)
        .ok_or_else(|| AppError::Internal(format!("Unrepresentable average {}", mean)))?;

    let humidities: Vec<f64> = in_range.iter().filter_map(|e| e.main.humidity).collect();
    let humidity = if humidities.is_empty() {
        DEFAULT_HUMIDITY
    } else {
        (humidities.iter().sum::<f64>() / humidities.len() as f64).round_ties_even() as i32
    };

    let description = most_frequent(in_range.iter().map(|e| e.description()))
        .unwrap_or("Unknown")
        .to_string();

    Ok(WeatherSummary {
        temperature_min,
        temperature_max,
        temperature_avg,
        humidity,
        description,
    })
}

/// Mode of the sequence; on a tie the value seen first wins
pub fn most_frequent<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
