//! Repository layer for database operations

pub mod weather_records;
pub mod weather_searches;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{NewWeatherRecord, NewWeatherSearch, RecordQuery, SearchQuery, WeatherRecord, WeatherSearch},
};

/// Persistence of aggregated weather records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// One page of records, newest first, plus the total matching count
    async fn list(&self, query: &RecordQuery) -> AppResult<(Vec<WeatherRecord>, i64)>;

    /// Every record, newest first
    async fn list_all(&self) -> AppResult<Vec<WeatherRecord>>;

    async fn get_by_id(&self, id: i64) -> AppResult<WeatherRecord>;

    async fn create(&self, data: &NewWeatherRecord) -> AppResult<WeatherRecord>;

    /// Replace every field of an existing record
    async fn update(&self, id: i64, data: &NewWeatherRecord) -> AppResult<WeatherRecord>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Append-only audit log of weather lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchLog: Send + Sync {
    async fn record(&self, entry: &NewWeatherSearch) -> AppResult<WeatherSearch>;

    async fn list(&self, query: &SearchQuery) -> AppResult<(Vec<WeatherSearch>, i64)>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub records: weather_records::WeatherRecordsRepository,
    pub searches: weather_searches::WeatherSearchesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            records: weather_records::WeatherRecordsRepository::new(pool.clone()),
            searches: weather_searches::WeatherSearchesRepository::new(pool.clone()),
            pool,
        }
    }
}
