//! Record workflow: geocode, fetch, aggregate, persist

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{
        observation::DEFAULT_ICON, record_form::decimal, NewWeatherRecord, RecordInput,
        RecordQuery, WeatherObservations, WeatherRecord,
    },
    repository::RecordStore,
};

use super::{aggregation::aggregate, geocoding::Geocoder, open_meteo::WeatherSource};

/// hPa
pub const STORED_PRESSURE: Decimal = Decimal::from_parts(1013, 0, 0, false, 0);
/// m/s
pub const STORED_WIND_SPEED: Decimal = Decimal::from_parts(50, 0, 0, false, 1);
/// mm
pub const STORED_PRECIPITATION: Decimal = Decimal::from_parts(0, 0, 0, false, 1);
/// Largest value a NUMERIC(6, 2) column holds
pub const STORED_VISIBILITY: Decimal = Decimal::from_parts(999_999, 0, 0, false, 2);
pub const STORED_UV_INDEX: Decimal = Decimal::from_parts(50, 0, 0, false, 1);

#[derive(Clone)]
pub struct RecordsService {
    store: Arc<dyn RecordStore>,
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherSource>,
}

impl RecordsService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherSource>,
    ) -> Self {
        Self {
            store,
            geocoder,
            weather,
        }
    }

    pub async fn list(&self, query: &RecordQuery) -> AppResult<(Vec<WeatherRecord>, i64)> {
        self.store.list(query).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<WeatherRecord>> {
        self.store.list_all().await
    }

    pub async fn get(&self, id: i64) -> AppResult<WeatherRecord> {
        self.store.get_by_id(id).await
    }

    pub async fn create(&self, input: &RecordInput) -> AppResult<WeatherRecord> {
        self.create_on(input, today()).await
    }

    /// Create with `today` deciding between the forecast and historical source
    pub async fn create_on(&self, input: &RecordInput, today: NaiveDate) -> AppResult<WeatherRecord> {
        let data = self.summarize(input, today).await?;
        let record = self.store.create(&data).await?;
        tracing::info!("Created weather record {} for {}", record.id, record.location_name);
        Ok(record)
    }

    pub async fn update(&self, id: i64, input: &RecordInput) -> AppResult<WeatherRecord> {
        self.update_on(id, input, today()).await
    }

    /// Re-fetch and re-aggregate an existing record from the submitted form values
    pub async fn update_on(
        &self,
        id: i64,
        input: &RecordInput,
        today: NaiveDate,
    ) -> AppResult<WeatherRecord> {
        self.store.get_by_id(id).await?;
        let data = self.summarize(input, today).await?;
        let record = self.store.update(id, &data).await?;
        tracing::info!("Updated weather record {}", id);
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.store.delete(id).await?;
        tracing::info!("Deleted weather record {}", id);
        Ok(())
    }

    async fn observations(
        &self,
        latitude: f64,
        longitude: f64,
        input: &RecordInput,
        today: NaiveDate,
    ) -> AppResult<WeatherObservations> {
        if input.start_date < today {
            self.weather
                .historical(latitude, longitude, input.start_date, input.end_date)
                .await
        } else {
            self.weather.forecast(latitude, longitude).await
        }
    }

    async fn summarize(&self, input: &RecordInput, today: NaiveDate) -> AppResult<NewWeatherRecord> {
        let place = self.geocoder.geocode(&input.location_name).await?;
        let observations = self
            .observations(place.latitude, place.longitude, input, today)
            .await?;
        let summary = aggregate(&observations.forecast.list, input.start_date, input.end_date)?;

        tracing::debug!(
            "Aggregated {} to {} for {}: {:?}",
            input.start_date,
            input.end_date,
            place.name,
            summary
        );

        let temperature = |value: f64| {
            decimal(value, 2)
                .ok_or_else(|| AppError::Internal(format!("Unrepresentable temperature {}", value)))
        };

        Ok(NewWeatherRecord {
            location_name: input.location_name.clone(),
            location_type: input.location_type,
            latitude: decimal(place.latitude, 6),
            longitude: decimal(place.longitude, 6),
            start_date: input.start_date,
            end_date: input.end_date,
            temperature_min: Some(temperature(summary.temperature_min)?),
            temperature_max: Some(temperature(summary.temperature_max)?),
            temperature_avg: Some(summary.temperature_avg),
            humidity: Some(summary.humidity),
            pressure: Some(STORED_PRESSURE),
            wind_speed: Some(STORED_WIND_SPEED),
            wind_direction: input.wind_direction.clone(),
            description: Some(summary.description),
            icon: Some(DEFAULT_ICON.to_string()),
            precipitation: Some(STORED_PRECIPITATION),
            visibility: Some(STORED_VISIBILITY),
            uv_index: Some(STORED_UV_INDEX),
            notes: input.notes.clone(),
        })
    }
}

/// Calendar date on the server's clock
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
