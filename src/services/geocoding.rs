//! Forward geocoding: free text to coordinates (Google Geocoding API)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::GeocodingConfig,
    error::{AppError, AppResult},
    models::GeocodedLocation,
};

/// Resolves a location description to coordinates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> AppResult<GeocodedLocation>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    formatted_address: String,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Clone)]
pub struct GoogleGeocoder {
    client: Client,
    config: GeocodingConfig,
}

impl GoogleGeocoder {
    pub fn new(client: Client, config: GeocodingConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> AppResult<GeocodedLocation> {
        let key = self.config.usable_api_key().ok_or_else(|| {
            AppError::Configuration(
                "Google Maps API key is required for location services.".to_string(),
            )
        })?;

        let response = self
            .client
            .get(&self.config.url)
            .query(&[("address", query), ("key", key)])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Geocoding request failed: {}", e)))?;

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid geocoding response: {}", e)))?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            status => {
                let detail = body.error_message.unwrap_or_else(|| status.to_string());
                return Err(AppError::Upstream(format!("Geocoding error: {}", detail)));
            }
        }

        let first = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Location not found".to_string()))?;

        tracing::debug!("Geocoded '{}' to {}", query, first.formatted_address);

        Ok(GeocodedLocation {
            name: first.formatted_address,
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
        })
    }
}
