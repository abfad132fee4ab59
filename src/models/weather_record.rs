//! Weather record model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use sqlx::FromRow;
use thiserror::Error;

use super::enums::LocationType;
use crate::error::{AppError, AppResult};

/// Longest allowed span between start and end date, in days
pub const MAX_RANGE_DAYS: i64 = 30;

/// Stored weather summary for a location over a date range
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeatherRecord {
    pub id: i64,
    pub location_name: String,
    #[sqlx(try_from = "String")]
    pub location_type: LocationType,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Celsius
    pub temperature_min: Option<Decimal>,
    pub temperature_max: Option<Decimal>,
    pub temperature_avg: Option<Decimal>,
    /// Percent (0-100)
    pub humidity: Option<i32>,
    /// hPa
    pub pressure: Option<Decimal>,
    /// m/s
    pub wind_speed: Option<Decimal>,
    pub wind_direction: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// mm
    pub precipitation: Option<Decimal>,
    /// km
    pub visibility: Option<Decimal>,
    pub uv_index: Option<Decimal>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WeatherRecord {
    /// "min°C - max°C", falling back to the average, then "N/A"
    pub fn temperature_range(&self) -> String {
        match (self.temperature_min, self.temperature_max, self.temperature_avg) {
            (Some(min), Some(max), _) => format!("{}°C - {}°C", min, max),
            (_, _, Some(avg)) => format!("{}°C", avg),
            _ => "N/A".to_string(),
        }
    }

    /// Number of calendar days covered, both ends included
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn label(&self) -> String {
        format!(
            "{} ({} to {})",
            self.location_name, self.start_date, self.end_date
        )
    }
}

/// Field values for inserting or replacing a record
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeatherRecord {
    pub location_name: String,
    pub location_type: LocationType,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub temperature_min: Option<Decimal>,
    pub temperature_max: Option<Decimal>,
    pub temperature_avg: Option<Decimal>,
    pub humidity: Option<i32>,
    pub pressure: Option<Decimal>,
    pub wind_speed: Option<Decimal>,
    pub wind_direction: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub precipitation: Option<Decimal>,
    pub visibility: Option<Decimal>,
    pub uv_index: Option<Decimal>,
    pub notes: String,
}

impl NewWeatherRecord {
    /// Persistence-time check of the record invariants
    pub fn validate_invariants(&self, today: NaiveDate) -> AppResult<()> {
        check_date_range(self.start_date, self.end_date, today)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let (Some(min), Some(max)) = (self.temperature_min, self.temperature_max) {
            if min > max {
                return Err(AppError::Validation(
                    "Minimum temperature cannot be higher than maximum temperature".to_string(),
                ));
            }
        }
        if let Some(lat) = self.latitude {
            if lat < Decimal::from(-90) || lat > Decimal::from(90) {
                return Err(AppError::Validation(
                    "Latitude must be between -90 and 90".to_string(),
                ));
            }
        }
        if let Some(lon) = self.longitude {
            if lon < Decimal::from(-180) || lon > Decimal::from(180) {
                return Err(AppError::Validation(
                    "Longitude must be between -180 and 180".to_string(),
                ));
            }
        }
        if let Some(humidity) = self.humidity {
            if !(0..=100).contains(&humidity) {
                return Err(AppError::Validation(
                    "Humidity must be between 0 and 100 percent".to_string(),
                ));
            }
        }
        if let Some(uv) = self.uv_index {
            if uv < Decimal::ZERO || uv > Decimal::from(11) {
                return Err(AppError::Validation(
                    "UV index must be between 0 and 11".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Date range rule violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("Start date cannot be after end date")]
    StartAfterEnd,
    #[error("Date range cannot exceed 30 days")]
    TooLong,
    #[error("Dates cannot be in the future")]
    InFuture,
}

impl DateRangeError {
    /// Form field the violation is reported against
    pub fn field(&self) -> &'static str {
        match self {
            DateRangeError::StartAfterEnd => "start_date",
            DateRangeError::TooLong | DateRangeError::InFuture => "end_date",
        }
    }
}

/// start <= end, at most [`MAX_RANGE_DAYS`] apart, neither after `today`
pub fn check_date_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), DateRangeError> {
    if start > end {
        return Err(DateRangeError::StartAfterEnd);
    }
    if (end - start).num_days() > MAX_RANGE_DAYS {
        return Err(DateRangeError::TooLong);
    }
    if start > today || end > today {
        return Err(DateRangeError::InFuture);
    }
    Ok(())
}

/// List filter and pagination for records
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordQuery {
    /// Case-insensitive substring matched against location, description and notes
    pub search: Option<String>,
    /// Page number (1-based)
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page: Option<i64>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub per_page: Option<i64>,
    /// Banner shown after a redirect
    pub notice: Option<String>,
}

impl RecordQuery {
    pub const DEFAULT_PER_PAGE: i64 = 10;

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, 100)
    }

    /// Rows skipped before the current page; saturates for absurd page numbers
    pub fn offset(&self) -> i64 {
        self.page().saturating_sub(1).saturating_mul(self.per_page())
    }

    /// Trimmed search term, if any
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
