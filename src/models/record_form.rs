//! Record form handling: raw submitted values, parsing and field-level validation

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::{
    enums::LocationType,
    weather_record::{check_date_range, WeatherRecord},
};

const REQUIRED: &str = "This field is required.";

/// Values exactly as submitted by the record form, kept for re-display
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordForm {
    pub location_name: String,
    pub location_type: String,
    pub latitude: String,
    pub longitude: String,
    pub start_date: String,
    pub end_date: String,
    pub temperature_min: String,
    pub temperature_max: String,
    pub temperature_avg: String,
    pub humidity: String,
    pub pressure: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub description: String,
    pub icon: String,
    pub precipitation: String,
    pub visibility: String,
    pub uv_index: String,
    pub notes: String,
}

/// Typed form values
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct RecordInput {
    #[validate(length(min = 1, max = 200, message = "Location name must be 1 to 200 characters"))]
    pub location_name: String,
    pub location_type: LocationType,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90 degrees"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180 degrees"))]
    pub longitude: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    pub temperature_avg: Option<f64>,
    #[validate(range(min = 0, max = 100, message = "Humidity must be between 0 and 100 percent"))]
    pub humidity: Option<i32>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    #[validate(length(max = 10, message = "Wind direction must be at most 10 characters"))]
    pub wind_direction: Option<String>,
    #[validate(length(max = 200, message = "Description must be at most 200 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 50, message = "Icon must be at most 50 characters"))]
    pub icon: Option<String>,
    pub precipitation: Option<f64>,
    pub visibility: Option<f64>,
    #[validate(range(min = 0.0, max = 11.0, message = "UV index must be between 0 and 11"))]
    pub uv_index: Option<f64>,
    pub notes: String,
}

/// Validation messages keyed by form field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// All messages joined, for flash banners and logs
    pub fn summary(&self) -> String {
        self.0
            .values()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn extend_from(&mut self, errors: &ValidationErrors) {
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                self.add(&field.to_string(), message);
            }
        }
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl RecordForm {
    /// Pre-fill the form from a stored record (update page)
    pub fn from_record(record: &WeatherRecord) -> Self {
        fn show<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        Self {
            location_name: record.location_name.clone(),
            location_type: record.location_type.as_str().to_string(),
            latitude: show(&record.latitude),
            longitude: show(&record.longitude),
            start_date: record.start_date.to_string(),
            end_date: record.end_date.to_string(),
            temperature_min: show(&record.temperature_min),
            temperature_max: show(&record.temperature_max),
            temperature_avg: show(&record.temperature_avg),
            humidity: show(&record.humidity),
            pressure: show(&record.pressure),
            wind_speed: show(&record.wind_speed),
            wind_direction: show(&record.wind_direction),
            description: show(&record.description),
            icon: show(&record.icon),
            precipitation: show(&record.precipitation),
            visibility: show(&record.visibility),
            uv_index: show(&record.uv_index),
            notes: record.notes.clone(),
        }
    }

    /// Parse and validate against the calendar date `today`
    pub fn validate(&self, today: NaiveDate) -> Result<RecordInput, FieldErrors> {
        let input = self.parse()?;
        input.check(today)?;
        Ok(input)
    }

    /// Type conversion only; range rules are applied by [`RecordInput::check`]
    pub fn parse(&self) -> Result<RecordInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let location_name = self.location_name.trim().to_string();
        if location_name.is_empty() {
            errors.add("location_name", REQUIRED);
        }

        let location_type = match self.location_type.trim() {
            "" => LocationType::default(),
            code => code.parse().unwrap_or_else(|_| {
                errors.add(
                    "location_type",
                    format!("Select a valid choice. {} is not one of the available choices.", code),
                );
                LocationType::default()
            }),
        };

        let start_date = parse_date(&mut errors, "start_date", &self.start_date);
        let end_date = parse_date(&mut errors, "end_date", &self.end_date);

        let input = RecordInput {
            location_name,
            location_type,
            latitude: parse_number(&mut errors, "latitude", &self.latitude),
            longitude: parse_number(&mut errors, "longitude", &self.longitude),
            start_date: start_date.unwrap_or_default(),
            end_date: end_date.unwrap_or_default(),
            temperature_min: parse_number(&mut errors, "temperature_min", &self.temperature_min),
            temperature_max: parse_number(&mut errors, "temperature_max", &self.temperature_max),
            temperature_avg: parse_number(&mut errors, "temperature_avg", &self.temperature_avg),
            humidity: parse_integer(&mut errors, "humidity", &self.humidity),
            pressure: parse_number(&mut errors, "pressure", &self.pressure),
            wind_speed: parse_number(&mut errors, "wind_speed", &self.wind_speed),
            wind_direction: optional_text(&self.wind_direction),
            description: optional_text(&self.description),
            icon: optional_text(&self.icon),
            precipitation: parse_number(&mut errors, "precipitation", &self.precipitation),
            visibility: parse_number(&mut errors, "visibility", &self.visibility),
            uv_index: parse_number(&mut errors, "uv_index", &self.uv_index),
            notes: self.notes.trim().to_string(),
        };

        errors.into_result().map(|_| input)
    }
}

impl RecordInput {
    /// Field ranges plus the cross-field rules (date range, temperature ordering)
    pub fn check(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Err(e) = Validate::validate(self) {
            errors.extend_from(&e);
        }

        if let Err(e) = check_date_range(self.start_date, self.end_date, today) {
            errors.add(e.field(), e.to_string());
        }

        if let (Some(min), Some(max)) = (self.temperature_min, self.temperature_max) {
            if min > max {
                errors.add(
                    "temperature_min",
                    "Minimum temperature cannot be higher than maximum temperature",
                );
            }
        }

        errors.into_result()
    }
}

/// Lossless-enough conversion for storage in a fixed-scale column
pub fn decimal(value: f64, scale: u32) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| d.round_dp(scale))
}

fn parse_date(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Enter a valid date.");
            None
        }
    }
}

fn parse_number(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            errors.add(field, "Enter a number.");
            None
        }
    }
}

fn parse_integer(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, "Enter a whole number.");
            None
        }
    }
}

fn optional_text(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}
