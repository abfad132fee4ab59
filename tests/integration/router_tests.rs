//! In-process tests of the HTTP surface

use axum::http::{header, StatusCode};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::support::{
    assert_status, body_json, body_text, location, StubGeocoder, StubWeather, TestApp,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn march_app() -> TestApp {
    TestApp::new(
        StubGeocoder::paris(),
        StubWeather::noon_readings(&[
            (day(1), 4.0, "Overcast"),
            (day(2), 8.0, "Overcast"),
            (day(3), 9.0, "Light rain"),
        ]),
    )
}

const MARCH_FORM: &str = "location_name=Paris&location_type=city\
    &start_date=2024-03-01&end_date=2024-03-03&notes=spring+trip";

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_reports_missing_api_key() {
    let app = march_app();
    let response = app.get("/health").await;
    assert_status(&response, StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["geocoding_configured"], false);
}

// ---------------------------------------------------------------------------
// Weather lookups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_location_lookup_succeeds_and_is_logged() {
    let app = march_app();
    let response = app
        .post_json("/api/weather/", r#"{"location": "  Paris "}"#)
        .await;
    assert_status(&response, StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["location"]["name"], "Paris, France");
    assert_eq!(body["forecast"]["list"].as_array().unwrap().len(), 3);

    let logged = app.searches.all();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].location_query, "Paris");
    assert!(logged[0].success);
    assert_eq!(logged[0].error_message, None);
}

#[tokio::test]
async fn test_rejected_lookups_are_logged_as_failures() {
    let app = TestApp::new(StubGeocoder(None), StubWeather(Some(Vec::new())));

    let cases = [
        ("{not json", "Invalid JSON"),
        (r#"{"location": "   "}"#, "Location is required"),
        (r#"{"location": "Atlantis"}"#, "Location not found"),
    ];
    for (body, message) in cases {
        let response = app.post_json("/api/weather/", body).await;
        assert_status(&response, StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], message);
    }

    let logged = app.searches.all();
    assert_eq!(logged.len(), 3);
    assert!(logged.iter().all(|s| !s.success));
    assert_eq!(logged[2].location_query, "Atlantis");
    assert_eq!(logged[2].error_message.as_deref(), Some("Location not found"));
}

#[tokio::test]
async fn test_provider_outage_is_bad_request() {
    let app = TestApp::new(StubGeocoder::paris(), StubWeather(None));
    let response = app
        .post_json("/api/weather/", r#"{"location": "Paris"}"#)
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let logged = app.searches.all();
    assert_eq!(logged.len(), 1);
    assert_eq!(
        logged[0].error_message.as_deref(),
        Some("Weather API error: service unavailable")
    );
}

#[tokio::test]
async fn test_lookup_rejects_other_methods() {
    let app = march_app();
    let response = app.get("/api/weather/").await;
    assert_status(&response, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await["error"], "Method not allowed");

    let response = app.get("/api/weather/coordinates/").await;
    assert_status(&response, StatusCode::METHOD_NOT_ALLOWED);

    assert!(app.searches.all().is_empty());
}

#[tokio::test]
async fn test_coordinates_lookup_accepts_strings() {
    let app = march_app();
    let response = app
        .post_json("/api/weather/coordinates/", r#"{"lat": "48.85", "lon": "2.35"}"#)
        .await;
    assert_status(&response, StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["location"].get("name").is_none());
    assert_eq!(body["location"]["lat"], 48.85);

    let logged = app.searches.all();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].location_query, "48.85,2.35");
}

#[tokio::test]
async fn test_coordinates_lookup_requires_both_values() {
    let app = march_app();
    let response = app
        .post_json("/api/weather/coordinates/", r#"{"lat": 10}"#)
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Latitude and longitude are required"
    );

    let response = app
        .post_json("/api/weather/coordinates/", r#"{"lat": 91, "lon": 0}"#)
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    assert_eq!(app.searches.all().len(), 2);
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_record_redirects_with_notice() {
    let app = march_app();
    let response = app.post_form("/records/create/", MARCH_FORM).await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/records/?notice=created"));

    let stored = app.records.all();
    assert_eq!(stored.len(), 1);
    let record = &stored[0];
    assert_eq!(record.location_name, "Paris");
    assert_eq!(record.temperature_min, Some(Decimal::from(4)));
    assert_eq!(record.temperature_max, Some(Decimal::from(9)));
    assert_eq!(record.description.as_deref(), Some("Overcast"));
    assert_eq!(record.notes, "spring trip");

    let response = app.get("/records/?notice=created").await;
    assert_status(&response, StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Weather record created successfully with real weather data!"));
    assert!(page.contains("Paris"));
}

#[tokio::test]
async fn test_invalid_form_is_redisplayed() {
    let app = march_app();
    let response = app
        .post_form("/records/create/", "location_name=&start_date=2024-03-01")
        .await;
    assert_status(&response, StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("errorlist"));
    assert!(page.contains("This field is required."));

    let response = app
        .post_form(
            "/records/create/",
            "location_name=Paris&start_date=2024-03-05&end_date=2024-03-01",
        )
        .await;
    assert_status(&response, StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Start date cannot be after end date"));
    assert!(page.contains("value=\"Paris\""));

    assert!(app.records.all().is_empty());
}

#[tokio::test]
async fn test_range_without_readings_shows_flash() {
    let app = march_app();
    let response = app
        .post_form(
            "/records/create/",
            "location_name=Paris&start_date=2023-01-01&end_date=2023-01-02",
        )
        .await;
    assert_status(&response, StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("No weather data available for the selected date range"));
    assert!(app.records.all().is_empty());
}

#[tokio::test]
async fn test_unknown_location_shows_flash() {
    let app = TestApp::new(StubGeocoder(None), StubWeather(Some(Vec::new())));
    let response = app.post_form("/records/create/", MARCH_FORM).await;
    assert_status(&response, StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("Error fetching weather data: Location not found"));
    assert!(app.records.all().is_empty());
}

#[tokio::test]
async fn test_update_and_delete_record() {
    let app = march_app();
    app.post_form("/records/create/", MARCH_FORM).await;
    let id = app.records.all()[0].id;

    let response = app.get(&format!("/records/{}/update/", id)).await;
    assert_status(&response, StatusCode::OK);
    assert!(body_text(response).await.contains("2024-03-01"));

    let response = app
        .post_form(
            &format!("/records/{}/update/", id),
            "location_name=Paris+centre&start_date=2024-03-02&end_date=2024-03-02",
        )
        .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/records/?notice=updated"));

    let record = app.records.all().remove(0);
    assert_eq!(record.location_name, "Paris centre");
    assert_eq!(record.temperature_min, record.temperature_max);
    assert_eq!(record.notes, "");

    let response = app.get(&format!("/records/{}/", id)).await;
    assert_status(&response, StatusCode::OK);
    assert!(body_text(response).await.contains("Paris centre"));

    let response = app
        .post_form(&format!("/records/{}/delete/", id), "")
        .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/records/?notice=deleted"));
    assert!(app.records.all().is_empty());

    let response = app
        .post_form(&format!("/records/{}/delete/", id), "")
        .await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let app = march_app();
    assert_status(&app.get("/records/42/").await, StatusCode::NOT_FOUND);
    assert_status(&app.get("/records/42/update/").await, StatusCode::NOT_FOUND);
    assert_status(
        &app.post_form("/records/42/update/", MARCH_FORM).await,
        StatusCode::NOT_FOUND,
    );
}

#[tokio::test]
async fn test_huge_page_number_is_an_empty_page() {
    let app = march_app();
    app.post_form("/records/create/", MARCH_FORM).await;

    let response = app.get("/records/?page=9223372036854775807").await;
    assert_status(&response, StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("No weather records found."));
    assert!(page.contains("Page 9223372036854775807 of 1 (1 records)"));

    let response = app.get("/api/searches/?page=9223372036854775807").await;
    assert_status(&response, StatusCode::OK);
    assert!(body_json(response).await["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_record_list_search() {
    let app = march_app();
    app.post_form("/records/create/", MARCH_FORM).await;
    app.post_form(
        "/records/create/",
        "location_name=Lyon&start_date=2024-03-01&end_date=2024-03-01",
    )
    .await;

    let page = body_text(app.get("/records/?search=lyon").await).await;
    assert!(page.contains(">Lyon<"));
    assert!(!page.contains(">Paris<"));

    let page = body_text(app.get("/records/?search=SPRING").await).await;
    assert!(page.contains(">Paris<"));
    assert!(!page.contains(">Lyon<"));
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_exports_set_type_and_filename() {
    let app = march_app();
    app.post_form("/records/create/", MARCH_FORM).await;

    let cases = [
        ("json", "application/json", "weather_data.json"),
        ("csv", "text/csv", "weather_data.csv"),
        ("pdf", "application/pdf", "weather_data.pdf"),
        (
            "excel",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "weather_data.xlsx",
        ),
        ("markdown", "text/markdown", "weather_data.md"),
    ];
    for (format, content_type, filename) in cases {
        let response = app.get(&format!("/export/{}/", format)).await;
        assert_status(&response, StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], content_type);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert_eq!(disposition, format!("attachment; filename=\"{}\"", filename));
        assert!(!body_text(response).await.is_empty());
    }

    let csv = body_text(app.get("/export/csv/").await).await;
    assert!(csv.starts_with("Location,Location Type"));
    assert!(csv.contains("Paris"));
}

#[tokio::test]
async fn test_unsupported_export_format() {
    let app = march_app();
    let response = app.get("/export/yaml/").await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Unsupported format");
}

// ---------------------------------------------------------------------------
// Search log
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_search_log_list_and_delete() {
    let app = march_app();
    app.post_json("/api/weather/", r#"{"location": "Paris"}"#).await;
    app.post_json("/api/weather/", r#"{"location": ""}"#).await;

    let response = app.get("/api/searches/?per_page=1").await;
    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["success"], false);
    assert_eq!(body["items"][0]["search_type"], "current");

    let id = app.searches.all()[0].id;
    assert_status(
        &app.delete(&format!("/api/searches/{}/", id)).await,
        StatusCode::NO_CONTENT,
    );
    assert_status(
        &app.delete(&format!("/api/searches/{}/", id)).await,
        StatusCode::NOT_FOUND,
    );
    assert_eq!(app.searches.all().len(), 1);
}
