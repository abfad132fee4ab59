//! Weather search audit log repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::SearchLog;
use crate::{
    error::{AppError, AppResult},
    models::{NewWeatherSearch, SearchQuery, WeatherSearch},
};

#[derive(Clone)]
pub struct WeatherSearchesRepository {
    pool: Pool<Postgres>,
}

impl WeatherSearchesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchLog for WeatherSearchesRepository {
    async fn record(&self, entry: &NewWeatherSearch) -> AppResult<WeatherSearch> {
        let row = sqlx::query_as::<_, WeatherSearch>(
            r#"
            INSERT INTO weather_searches (location_query, search_type, success, error_message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&entry.location_query)
        .bind(entry.search_type.as_str())
        .bind(entry.success)
        .bind(&entry.error_message)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list(&self, query: &SearchQuery) -> AppResult<(Vec<WeatherSearch>, i64)> {
        let per_page = query.per_page();
        let offset = query.offset();

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weather_searches")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, WeatherSearch>(
            "SELECT * FROM weather_searches ORDER BY timestamp DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM weather_searches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Weather search {} not found", id)));
        }
        Ok(())
    }
}
