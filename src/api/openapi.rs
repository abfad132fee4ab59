//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{export, health, searches, weather};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Records API",
        description = "Weather lookups, lookup audit log and record exports"
    ),
    paths(
        // Health
        health::health_check,
        // Weather lookups
        weather::weather_by_location,
        weather::weather_by_coordinates,
        // Audit log
        searches::list_searches,
        searches::delete_search,
        // Export
        export::export_records,
    ),
    components(
        schemas(
            // Weather lookups
            weather::LocationRequest,
            weather::CoordinatesRequest,
            crate::models::WeatherLookup,
            crate::models::observation::LookupLocation,
            crate::models::observation::CurrentConditions,
            crate::models::observation::CurrentMain,
            crate::models::observation::Condition,
            crate::models::observation::Wind,
            crate::models::observation::ForecastList,
            crate::models::ForecastEntry,
            crate::models::observation::EntryMain,
            // Audit log
            crate::models::WeatherSearch,
            crate::models::SearchType,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "weather", description = "Weather lookups by location or coordinates"),
        (name = "searches", description = "Weather lookup audit log"),
        (name = "export", description = "Record exports")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
