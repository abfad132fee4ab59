//! Record export endpoint

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{error::AppResult, services::export::ExportFormat};

/// Download every record as json, csv, pdf, excel or markdown
#[utoipa::path(
    get,
    path = "/export/{format}/",
    tag = "export",
    params(("format" = String, Path, description = "json, csv, pdf, excel or markdown")),
    responses(
        (status = 200, description = "Export file as an attachment"),
        (status = 400, description = "Unsupported format", body = crate::error::ErrorResponse)
    )
)]
pub async fn export_records(
    State(state): State<crate::AppState>,
    Path(format): Path<String>,
) -> AppResult<Response> {
    let format: ExportFormat = format.parse()?;
    let file = state.services.export.export(format).await?;

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.body,
    )
        .into_response())
}
