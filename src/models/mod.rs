//! Data models for the weather records server

pub mod enums;
pub mod observation;
pub mod record_form;
pub mod weather_record;
pub mod weather_search;

// Re-export commonly used types
pub use enums::{LocationType, SearchType};
pub use observation::{ForecastEntry, GeocodedLocation, WeatherLookup, WeatherObservations};
pub use record_form::{FieldErrors, RecordForm, RecordInput};
pub use weather_record::{NewWeatherRecord, RecordQuery, WeatherRecord};
pub use weather_search::{NewWeatherSearch, SearchQuery, WeatherSearch};
