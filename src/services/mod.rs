//! Business logic services

pub mod aggregation;
pub mod export;
pub mod geocoding;
pub mod lookups;
pub mod open_meteo;
pub mod records;

use std::sync::Arc;

use reqwest::Client;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    repository::{RecordStore, Repository, SearchLog},
};

use self::{
    geocoding::{Geocoder, GoogleGeocoder},
    open_meteo::{OpenMeteoClient, WeatherSource},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub weather: lookups::WeatherService,
    pub records: records::RecordsService,
    pub export: export::ExportService,
}

impl Services {
    /// Create all services backed by the database and the public providers
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        if config.geocoding.usable_api_key().is_none() {
            tracing::warn!("No Google Maps API key configured; location lookups will be refused");
        }

        Ok(Self::with_backends(
            Arc::new(repository.records),
            Arc::new(repository.searches),
            Arc::new(GoogleGeocoder::new(client.clone(), config.geocoding.clone())),
            Arc::new(OpenMeteoClient::new(client, &config.weather)),
        ))
    }

    /// Wire services over arbitrary stores and providers
    pub fn with_backends(
        records: Arc<dyn RecordStore>,
        searches: Arc<dyn SearchLog>,
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherSource>,
    ) -> Self {
        Self {
            weather: lookups::WeatherService::new(geocoder.clone(), weather.clone(), searches),
            records: records::RecordsService::new(records.clone(), geocoder, weather),
            export: export::ExportService::new(records),
        }
    }
}
