//! Weather search audit log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::SearchType;

/// One weather lookup attempt
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WeatherSearch {
    pub id: i64,
    /// Location text or "lat,lon" pair as submitted
    pub location_query: String,
    #[sqlx(try_from = "String")]
    pub search_type: SearchType,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    /// Empty when the lookup succeeded
    pub error_message: String,
}

/// Audit log entry to append
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeatherSearch {
    pub location_query: String,
    pub search_type: SearchType,
    pub success: bool,
    pub error_message: String,
}

impl NewWeatherSearch {
    pub fn succeeded(location_query: impl Into<String>, search_type: SearchType) -> Self {
        Self {
            location_query: location_query.into(),
            search_type,
            success: true,
            error_message: String::new(),
        }
    }

    pub fn failed(
        location_query: impl Into<String>,
        search_type: SearchType,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            location_query: location_query.into(),
            search_type,
            success: false,
            error_message: error_message.into(),
        }
    }
}

/// Pagination for the audit log
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct SearchQuery {
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Entries per page
    pub per_page: Option<i64>,
}

impl SearchQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(50).clamp(1, 200)
    }

    pub fn offset(&self) -> i64 {
        self.page().saturating_sub(1).saturating_mul(self.per_page())
    }
}
