//! Tests against a running server
//!
//! Start the server with a database and a Google Maps API key, then run with:
//! `cargo test -- --ignored`

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8000";

fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_weather_by_location() {
    let response = client()
        .post(format!("{}/api/weather/", BASE_URL))
        .json(&json!({ "location": "London" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["location"]["name"].is_string());
    assert!(body["current"]["main"]["temp"].is_number());
    assert!(body["forecast"]["list"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_weather_by_coordinates() {
    let response = client()
        .post(format!("{}/api/weather/coordinates/", BASE_URL))
        .json(&json!({ "lat": 51.5074, "lon": -0.1278 }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["location"]["lat"], 51.5074);
    assert!(body["location"].get("name").is_none());
}

#[tokio::test]
#[ignore]
async fn test_weather_requires_location() {
    let response = client()
        .post(format!("{}/api/weather/", BASE_URL))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_search_history() {
    let response = client()
        .get(format!("{}/api/searches/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_create_record() {
    let response = client()
        .post(format!("{}/records/create/", BASE_URL))
        .form(&[
            ("location_name", "London"),
            ("location_type", "city"),
            ("start_date", "2024-01-01"),
            ("end_date", "2024-01-07"),
        ])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
#[ignore]
async fn test_export_csv() {
    let response = client()
        .get(format!("{}/export/csv/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["content-type"],
        "text/csv"
    );
}
