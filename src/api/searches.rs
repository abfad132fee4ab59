//! Weather search audit log endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{SearchQuery, WeatherSearch},
};

use super::PaginatedResponse;

/// List logged weather lookups, newest first
#[utoipa::path(
    get,
    path = "/api/searches/",
    tag = "searches",
    params(SearchQuery),
    responses(
        (status = 200, description = "Logged lookups", body = PaginatedResponse<WeatherSearch>)
    )
)]
pub async fn list_searches(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<PaginatedResponse<WeatherSearch>>> {
    let (searches, total) = state.services.weather.history(&query).await?;

    Ok(Json(PaginatedResponse {
        items: searches,
        total,
        page: query.page(),
        per_page: query.per_page(),
    }))
}

/// Remove a logged lookup
#[utoipa::path(
    delete,
    path = "/api/searches/{id}/",
    tag = "searches",
    params(("id" = i64, Path, description = "Search log entry ID")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Entry not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_search(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.weather.delete_search(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
