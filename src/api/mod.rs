//! HTTP layer: JSON API, HTML pages and exports

pub mod export;
pub mod health;
pub mod openapi;
pub mod pages;
pub mod records;
pub mod searches;
pub mod weather;

use axum::{
    response::Html,
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::AppState;

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Entries on this page
    pub items: Vec<T>,
    /// Total number of entries
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Entries per page
    pub per_page: i64,
}

async fn home() -> Html<String> {
    pages::home()
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(home))
        .route("/health", get(health::health_check))
        // Weather lookups
        .route(
            "/api/weather/",
            post(weather::weather_by_location).fallback(weather::method_not_allowed),
        )
        .route(
            "/api/weather/coordinates/",
            post(weather::weather_by_coordinates).fallback(weather::method_not_allowed),
        )
        // Audit log
        .route("/api/searches/", get(searches::list_searches))
        .route("/api/searches/:id/", delete(searches::delete_search))
        // Records
        .route("/records/", get(records::list_records))
        .route(
            "/records/create/",
            get(records::new_record).post(records::create_record),
        )
        .route("/records/:id/", get(records::show_record))
        .route(
            "/records/:id/update/",
            get(records::edit_record).post(records::update_record),
        )
        .route(
            "/records/:id/delete/",
            get(records::confirm_delete).post(records::delete_record),
        )
        // Export
        .route("/export/:format/", get(export::export_records))
        .with_state(state);

    app.merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
