//! Weather records repository

use async_trait::async_trait;
use chrono::Local;
use sqlx::{Pool, Postgres};

use super::RecordStore;
use crate::{
    error::{AppError, AppResult},
    models::{NewWeatherRecord, RecordQuery, WeatherRecord},
};

const SEARCH_CLAUSE: &str =
    "WHERE location_name ILIKE $1 OR description ILIKE $1 OR notes ILIKE $1";

#[derive(Clone)]
pub struct WeatherRecordsRepository {
    pool: Pool<Postgres>,
}

impl WeatherRecordsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// `%term%` with the LIKE wildcards of `term` escaped
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl RecordStore for WeatherRecordsRepository {
    async fn list(&self, query: &RecordQuery) -> AppResult<(Vec<WeatherRecord>, i64)> {
        let per_page = query.per_page();
        let offset = query.offset();
        let pattern = query.search_term().map(like_pattern);

        let where_clause = if pattern.is_some() { SEARCH_CLAUSE } else { "" };

        // Count total
        let count_q = format!("SELECT COUNT(*) FROM weather_records {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(p) = &pattern {
            count_builder = count_builder.bind(p);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        // Fetch rows
        let select_q = format!(
            "SELECT * FROM weather_records {} ORDER BY created_at DESC, id DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, WeatherRecord>(&select_q);
        if let Some(p) = &pattern {
            builder = builder.bind(p);
        }
        let rows = builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    async fn list_all(&self) -> AppResult<Vec<WeatherRecord>> {
        let rows = sqlx::query_as::<_, WeatherRecord>(
            "SELECT * FROM weather_records ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<WeatherRecord> {
        sqlx::query_as::<_, WeatherRecord>("SELECT * FROM weather_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Weather record {} not found", id)))
    }

    async fn create(&self, data: &NewWeatherRecord) -> AppResult<WeatherRecord> {
        data.validate_invariants(Local::now().date_naive())?;

        let record = sqlx::query_as::<_, WeatherRecord>(
            r#"
            INSERT INTO weather_records (
                location_name, location_type, latitude, longitude, start_date, end_date,
                temperature_min, temperature_max, temperature_avg, humidity, pressure,
                wind_speed, wind_direction, description, icon, precipitation, visibility,
                uv_index, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(&data.location_name)
        .bind(data.location_type.as_str())
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.temperature_min)
        .bind(data.temperature_max)
        .bind(data.temperature_avg)
        .bind(data.humidity)
        .bind(data.pressure)
        .bind(data.wind_speed)
        .bind(&data.wind_direction)
        .bind(&data.description)
        .bind(&data.icon)
        .bind(data.precipitation)
        .bind(data.visibility)
        .bind(data.uv_index)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created weather record {}", record.id);
        Ok(record)
    }

    async fn update(&self, id: i64, data: &NewWeatherRecord) -> AppResult<WeatherRecord> {
        data.validate_invariants(Local::now().date_naive())?;

        sqlx::query_as::<_, WeatherRecord>(
            r#"
            UPDATE weather_records SET
                location_name = $1, location_type = $2, latitude = $3, longitude = $4,
                start_date = $5, end_date = $6, temperature_min = $7, temperature_max = $8,
                temperature_avg = $9, humidity = $10, pressure = $11, wind_speed = $12,
                wind_direction = $13, description = $14, icon = $15, precipitation = $16,
                visibility = $17, uv_index = $18, notes = $19, updated_at = NOW()
            WHERE id = $20
            RETURNING *
            "#,
        )
        .bind(&data.location_name)
        .bind(data.location_type.as_str())
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.temperature_min)
        .bind(data.temperature_max)
        .bind(data.temperature_avg)
        .bind(data.humidity)
        .bind(data.pressure)
        .bind(data.wind_speed)
        .bind(&data.wind_direction)
        .bind(&data.description)
        .bind(&data.icon)
        .bind(data.precipitation)
        .bind(data.visibility)
        .bind(data.uv_index)
        .bind(&data.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Weather record {} not found", id)))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM weather_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Weather record {} not found", id)));
        }
        Ok(())
    }
}
