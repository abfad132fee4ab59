//! Error types for the weather records server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or placeholder credentials for an external service
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    NotFound(String),

    /// Transport or payload failure from the geocoding or weather provider
    #[error("{0}")]
    Upstream(String),

    /// Aggregation found nothing usable in the requested range
    #[error("{0}")]
    NoData(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::NotFound(_) => "not_found",
            AppError::Upstream(_) => "upstream",
            AppError::NoData(_) => "no_data",
            AppError::Validation(_) => "validation",
            AppError::UnsupportedFormat(_) => "unsupported_format",
            AppError::Database(_) => "database",
            AppError::BadRequest(_) => "bad_request",
            AppError::Internal(_) => "internal",
        }
    }

    /// Errors raised while talking to (or preparing to talk to) an external provider
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            AppError::Configuration(_)
                | AppError::NotFound(_)
                | AppError::Upstream(_)
                | AppError::NoData(_)
        )
    }

    /// Message safe to show to an end user
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::UnsupportedFormat(_) => "Unsupported format".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_)
            | AppError::NoData(_)
            | AppError::Validation(_)
            | AppError::UnsupportedFormat(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream error: {}", msg);
                StatusCode::BAD_GATEWAY
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.public_message(),
            kind: self.kind().to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
