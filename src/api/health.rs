//! Liveness endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "healthy" whenever the process answers
    pub status: String,
    /// Crate version
    pub version: String,
    /// Whether location lookups can reach the geocoder (an API key is set)
    pub geocoding_configured: bool,
}

/// Liveness and configuration summary
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<crate::AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoding_configured: state.config.geocoding.usable_api_key().is_some(),
    })
}
