//! Weather lookup endpoints

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use utoipa::ToSchema;

use crate::{
    error::{AppError, ErrorResponse},
    models::WeatherLookup,
};

/// Lookup by free-text location
#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationRequest {
    /// City, zip code, landmark or address
    pub location: Option<String>,
}

/// Lookup by coordinates, given as numbers or numeric strings
#[serde_as]
#[derive(Debug, Deserialize, ToSchema)]
pub struct CoordinatesRequest {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[schema(value_type = Option<f64>)]
    pub lat: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[schema(value_type = Option<f64>)]
    pub lon: Option<f64>,
}

fn bad_request(message: &str, kind: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
            kind: kind.to_string(),
        }),
    )
        .into_response()
}

/// Provider and input failures are reported as 400; storage failures keep their status
fn lookup_error(err: AppError) -> Response {
    match err {
        AppError::Validation(_) | AppError::BadRequest(_) => {
            bad_request(&err.public_message(), err.kind())
        }
        err if err.is_lookup_failure() => {
            tracing::warn!("Weather lookup failed: {}", err);
            bad_request(&err.public_message(), err.kind())
        }
        err => err.into_response(),
    }
}

/// Log a request rejected before any lookup, then answer 400
async fn reject(state: &crate::AppState, query: &str, message: &str) -> Response {
    match state.services.weather.record_failure(query, message).await {
        Ok(()) => bad_request(message, "bad_request"),
        Err(e) => e.into_response(),
    }
}

/// Current weather and hourly forecast for a location
#[utoipa::path(
    post,
    path = "/api/weather/",
    tag = "weather",
    request_body = LocationRequest,
    responses(
        (status = 200, description = "Weather for the geocoded location", body = WeatherLookup),
        (status = 400, description = "Missing location or lookup failure", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn weather_by_location(State(state): State<crate::AppState>, body: Bytes) -> Response {
    let request: LocationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return reject(&state, "", "Invalid JSON").await,
    };

    let location = request.location.as_deref().map(str::trim).unwrap_or_default();
    if location.is_empty() {
        return reject(&state, "", "Location is required").await;
    }

    match state.services.weather.lookup_location(location).await {
        Ok(lookup) => Json(lookup).into_response(),
        Err(e) => lookup_error(e),
    }
}

/// Current weather and hourly forecast for explicit coordinates
#[utoipa::path(
    post,
    path = "/api/weather/coordinates/",
    tag = "weather",
    request_body = CoordinatesRequest,
    responses(
        (status = 200, description = "Weather at the coordinates", body = WeatherLookup),
        (status = 400, description = "Missing or invalid coordinates, or lookup failure", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn weather_by_coordinates(State(state): State<crate::AppState>, body: Bytes) -> Response {
    let request: CoordinatesRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return reject(&state, "", "Invalid JSON").await,
    };

    let (Some(lat), Some(lon)) = (request.lat, request.lon) else {
        let query = format!(
            "{},{}",
            request.lat.map(|v| v.to_string()).unwrap_or_default(),
            request.lon.map(|v| v.to_string()).unwrap_or_default()
        );
        return reject(&state, &query, "Latitude and longitude are required").await;
    };

    match state.services.weather.lookup_coordinates(lat, lon).await {
        Ok(lookup) => Json(lookup).into_response(),
        Err(e) => lookup_error(e),
    }
}

/// JSON 405 for the lookup routes
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
            kind: "method_not_allowed".to_string(),
        }),
    )
        .into_response()
}
