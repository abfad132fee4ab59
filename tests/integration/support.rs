//! In-memory stores and canned providers for driving the router in-process

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use chrono::{Local, NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;

use weather_records_server::{
    api,
    error::{AppError, AppResult},
    models::{
        observation::{
            Condition, CurrentConditions, CurrentMain, ForecastList, Wind, PRESSURE_PLACEHOLDER,
            VISIBILITY_PLACEHOLDER,
        },
        ForecastEntry, GeocodedLocation, NewWeatherRecord, NewWeatherSearch, RecordQuery,
        SearchQuery, WeatherObservations, WeatherRecord, WeatherSearch,
    },
    repository::{RecordStore, SearchLog},
    services::{geocoding::Geocoder, open_meteo::WeatherSource, Services},
    AppConfig, AppState,
};

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryRecords {
    rows: Mutex<Vec<WeatherRecord>>,
    next_id: AtomicI64,
}

impl MemoryRecords {
    pub fn all(&self) -> Vec<WeatherRecord> {
        self.rows.lock().unwrap().clone()
    }

    fn not_found(id: i64) -> AppError {
        AppError::NotFound(format!("Weather record {} not found", id))
    }

    fn build(id: i64, data: &NewWeatherRecord) -> WeatherRecord {
        let now = Utc::now();
        WeatherRecord {
            id,
            location_name: data.location_name.clone(),
            location_type: data.location_type,
            latitude: data.latitude,
            longitude: data.longitude,
            start_date: data.start_date,
            end_date: data.end_date,
            temperature_min: data.temperature_min,
            temperature_max: data.temperature_max,
            temperature_avg: data.temperature_avg,
            humidity: data.humidity,
            pressure: data.pressure,
            wind_speed: data.wind_speed,
            wind_direction: data.wind_direction.clone(),
            description: data.description.clone(),
            icon: data.icon.clone(),
            precipitation: data.precipitation,
            visibility: data.visibility,
            uv_index: data.uv_index,
            notes: data.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecords {
    async fn list(&self, query: &RecordQuery) -> AppResult<(Vec<WeatherRecord>, i64)> {
        let term = query.search_term().map(str::to_lowercase);
        let matches = |r: &WeatherRecord| match &term {
            None => true,
            Some(t) => {
                r.location_name.to_lowercase().contains(t)
                    || r.description.as_deref().unwrap_or_default().to_lowercase().contains(t)
                    || r.notes.to_lowercase().contains(t)
            }
        };

        let mut rows: Vec<WeatherRecord> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matches(r))
            .cloned()
            .collect();
        rows.reverse();

        let total = rows.len() as i64;
        let page = rows
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.per_page() as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_all(&self) -> AppResult<Vec<WeatherRecord>> {
        let mut rows = self.all();
        rows.reverse();
        Ok(rows)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<WeatherRecord> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, data: &NewWeatherRecord) -> AppResult<WeatherRecord> {
        data.validate_invariants(Local::now().date_naive())?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = Self::build(id, data);
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, data: &NewWeatherRecord) -> AppResult<WeatherRecord> {
        data.validate_invariants(Local::now().date_naive())?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        let created_at = row.created_at;
        *row = Self::build(id, data);
        row.created_at = created_at;
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySearchLog {
    rows: Mutex<Vec<WeatherSearch>>,
}

impl MemorySearchLog {
    pub fn all(&self) -> Vec<WeatherSearch> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchLog for MemorySearchLog {
    async fn record(&self, entry: &NewWeatherSearch) -> AppResult<WeatherSearch> {
        let mut rows = self.rows.lock().unwrap();
        let row = WeatherSearch {
            id: rows.len() as i64 + 1,
            location_query: entry.location_query.clone(),
            search_type: entry.search_type,
            timestamp: Utc::now(),
            success: entry.success,
            error_message: entry.error_message.clone(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list(&self, query: &SearchQuery) -> AppResult<(Vec<WeatherSearch>, i64)> {
        let mut rows = self.all();
        rows.reverse();
        let total = rows.len() as i64;
        let page = rows
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.per_page() as usize)
            .collect();
        Ok((page, total))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound(format!("Weather search {} not found", id)));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Resolves every query to the same place, or to nothing
pub struct StubGeocoder(pub Option<GeocodedLocation>);

impl StubGeocoder {
    pub fn paris() -> Self {
        Self(Some(GeocodedLocation {
            name: "Paris, France".to_string(),
            latitude: 48.856613,
            longitude: 2.352222,
        }))
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, _query: &str) -> AppResult<GeocodedLocation> {
        self.0
            .clone()
            .ok_or_else(|| AppError::NotFound("Location not found".to_string()))
    }
}

/// Serves the same hourly readings for both modes; `None` simulates an outage
pub struct StubWeather(pub Option<Vec<ForecastEntry>>);

impl StubWeather {
    /// One reading at noon on each of the given days
    pub fn noon_readings(days: &[(NaiveDate, f64, &str)]) -> Self {
        let entries = days
            .iter()
            .map(|(day, temp, desc)| {
                ForecastEntry::from_reading(
                    day.and_hms_opt(12, 0, 0).unwrap(),
                    Some(*temp),
                    Some(55.0),
                    *desc,
                )
            })
            .collect();
        Self(Some(entries))
    }

    fn observations(&self) -> AppResult<WeatherObservations> {
        let list = self
            .0
            .clone()
            .ok_or_else(|| AppError::Upstream("Weather API error: service unavailable".to_string()))?;
        Ok(WeatherObservations {
            current: CurrentConditions {
                main: CurrentMain {
                    temp: Some(18.0),
                    feels_like: Some(17.5),
                    humidity: Some(55.0),
                    pressure: PRESSURE_PLACEHOLDER,
                },
                weather: vec![Condition::new("Clear sky")],
                wind: Wind { speed: Some(2.0) },
                visibility: VISIBILITY_PLACEHOLDER,
            },
            forecast: ForecastList { list },
        })
    }
}

#[async_trait]
impl WeatherSource for StubWeather {
    async fn forecast(&self, _latitude: f64, _longitude: f64) -> AppResult<WeatherObservations> {
        self.observations()
    }

    async fn historical(
        &self,
        _latitude: f64,
        _longitude: f64,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> AppResult<WeatherObservations> {
        self.observations()
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub records: Arc<MemoryRecords>,
    pub searches: Arc<MemorySearchLog>,
}

impl TestApp {
    pub fn new(geocoder: impl Geocoder + 'static, weather: impl WeatherSource + 'static) -> Self {
        let records = Arc::new(MemoryRecords::default());
        let searches = Arc::new(MemorySearchLog::default());
        let services = Services::with_backends(
            records.clone(),
            searches.clone(),
            Arc::new(geocoder),
            Arc::new(weather),
        );
        let router = api::router(AppState {
            config: Arc::new(AppConfig::default()),
            services: Arc::new(services),
        });
        Self {
            router,
            records,
            searches,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status);
}
