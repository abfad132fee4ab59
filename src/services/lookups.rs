//! Ad-hoc weather lookups and their audit log

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        observation::LookupLocation, NewWeatherSearch, SearchQuery, SearchType, WeatherLookup,
        WeatherSearch,
    },
    repository::SearchLog,
};

use super::{geocoding::Geocoder, open_meteo::WeatherSource};

#[derive(Clone)]
pub struct WeatherService {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherSource>,
    searches: Arc<dyn SearchLog>,
}

impl WeatherService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherSource>,
        searches: Arc<dyn SearchLog>,
    ) -> Self {
        Self {
            geocoder,
            weather,
            searches,
        }
    }

    /// Geocode free text, then fetch the forecast there. Logs one audit entry.
    pub async fn lookup_location(&self, location: &str) -> AppResult<WeatherLookup> {
        let outcome = self.fetch_for_location(location).await;
        self.log_outcome(location, &outcome).await?;
        outcome
    }

    /// Forecast for explicit coordinates; no geocoding involved. Logs one audit entry.
    pub async fn lookup_coordinates(&self, latitude: f64, longitude: f64) -> AppResult<WeatherLookup> {
        let query = format!("{},{}", latitude, longitude);
        let outcome = self.fetch_for_coordinates(latitude, longitude).await;
        self.log_outcome(&query, &outcome).await?;
        outcome
    }

    /// Log a lookup that was rejected before any provider was called
    pub async fn record_failure(&self, query: &str, message: &str) -> AppResult<()> {
        tracing::info!("Weather lookup '{}' rejected: {}", query, message);
        self.searches
            .record(&NewWeatherSearch::failed(query, SearchType::Current, message))
            .await?;
        Ok(())
    }

    pub async fn history(&self, query: &SearchQuery) -> AppResult<(Vec<WeatherSearch>, i64)> {
        self.searches.list(query).await
    }

    pub async fn delete_search(&self, id: i64) -> AppResult<()> {
        self.searches.delete(id).await
    }

    async fn fetch_for_location(&self, location: &str) -> AppResult<WeatherLookup> {
        let place = self.geocoder.geocode(location).await?;
        let observations = self.weather.forecast(place.latitude, place.longitude).await?;
        Ok(WeatherLookup::new(
            observations,
            LookupLocation {
                name: Some(place.name),
                lat: place.latitude,
                lon: place.longitude,
            },
        ))
    }

    async fn fetch_for_coordinates(&self, latitude: f64, longitude: f64) -> AppResult<WeatherLookup> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::Validation(
                "Latitude must be between -90 and 90 and longitude between -180 and 180".to_string(),
            ));
        }
        let observations = self.weather.forecast(latitude, longitude).await?;
        Ok(WeatherLookup::new(
            observations,
            LookupLocation {
                name: None,
                lat: latitude,
                lon: longitude,
            },
        ))
    }

    async fn log_outcome<T>(&self, query: &str, outcome: &AppResult<T>) -> AppResult<()> {
        let entry = match outcome {
            Ok(_) => {
                tracing::info!("Weather lookup '{}' succeeded", query);
                NewWeatherSearch::succeeded(query, SearchType::Current)
            }
            Err(e) => {
                tracing::info!("Weather lookup '{}' failed: {}", query, e);
                NewWeatherSearch::failed(query, SearchType::Current, e.public_message())
            }
        };
        self.searches.record(&entry).await?;
        Ok(())
    }
}
