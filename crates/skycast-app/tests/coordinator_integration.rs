//! Coordinator scenarios against a mock backend.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use skycast_api::BackendClient;
use skycast_app::{App, SystemHealth};
use skycast_core::Units;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn start() -> (MockServer, App) {
    let backend = MockServer::start().await;
    let api = Arc::new(BackendClient::new(&backend.uri(), "/forecast").unwrap());
    (backend, App::new(api))
}

fn locations_body() -> serde_json::Value {
    json!([
        {
            "locationId": 1,
            "locationName": "Cape Town",
            "displayName": "Cape Town, ZA",
            "country": "ZA",
            "isFavorite": true,
            "temperature": 21.0,
            "lastUpdated": "2026-08-30T11:00:00"
        },
        {
            "locationId": 2,
            "locationName": "London",
            "displayName": null,
            "country": "GB",
            "isFavorite": false
        },
        {
            "locationId": 3,
            "locationName": "Tokyo",
            "displayName": null,
            "country": "JP",
            "isFavorite": false,
            "temperature": 28.5,
            "lastUpdated": "2026-08-30T10:30:00"
        }
    ])
}

#[tokio::test]
async fn test_load_applies_preferred_units_then_fetches() {
    let (backend, mut app) = start().await;

    Mock::given(method("GET"))
        .and(path("/preferences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "defaultUnits": "IMPERIAL"
        })))
        .expect(1)
        .mount(&backend)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather/locations"))
        .and(query_param("units", "IMPERIAL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations_body()))
        .expect(1)
        .mount(&backend)
        .await;

    app.load().await;

    assert_eq!(app.units(), Units::Imperial);
    assert_eq!(app.locations().len(), 3);
    assert!(app.fetch_error().is_none());
    assert!(!app.is_loading());
}

#[tokio::test]
async fn test_load_survives_preference_failure() {
    let (backend, mut app) = start().await;

    Mock::given(method("GET"))
        .and(path("/preferences"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather/locations"))
        .and(query_param("units", "METRIC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations_body()))
        .expect(1)
        .mount(&backend)
        .await;

    app.load().await;

    assert_eq!(app.units(), Units::Metric);
    assert_eq!(app.locations().len(), 3);
}

#[tokio::test]
async fn test_refresh_all_hits_every_location_and_refetches() {
    let (backend, mut app) = start().await;

    Mock::given(method("GET"))
        .and(path("/preferences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .mount(&backend)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations_body()))
        .expect(2)
        .mount(&backend)
        .await;

    for id in [1, 2, 3] {
        Mock::given(method("POST"))
            .and(path(format!("/weather/locations/{id}/refresh")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "locationId": id,
                "locationName": "x",
                "displayName": null,
                "country": "XX",
                "isFavorite": false
            })))
            .expect(1)
            .mount(&backend)
            .await;
    }

    app.load().await;
    app.refresh_all().await;

    assert!(!app.is_refreshing());
    let metrics = app.metrics(Utc::now());
    assert_eq!(metrics.session_refresh_count, 1);
    assert!(metrics.effective_last_sync.is_some());
}

#[tokio::test]
async fn test_refresh_failure_still_refetches() {
    let (backend, mut app) = start().await;

    Mock::given(method("GET"))
        .and(path("/preferences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .mount(&backend)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations_body()))
        .expect(2)
        .mount(&backend)
        .await;

    Mock::given(method("POST"))
        .and(path("/weather/locations/1/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend)
        .await;
    for id in [2, 3] {
        Mock::given(method("POST"))
            .and(path(format!("/weather/locations/{id}/refresh")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "locationId": id,
                "locationName": "x",
                "displayName": null,
                "country": "XX",
                "isFavorite": false
            })))
            .mount(&backend)
            .await;
    }

    app.load().await;
    app.refresh_all().await;

    // Count advances even on a partial failure; locations were refetched.
    let metrics = app.metrics(Utc::now());
    assert_eq!(metrics.session_refresh_count, 1);
    assert_eq!(app.locations().len(), 3);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_list_and_degrades_health() {
    let (backend, mut app) = start().await;

    Mock::given(method("GET"))
        .and(path("/preferences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .mount(&backend)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations_body()))
        .expect(1)
        .mount(&backend)
        .await;

    app.load().await;
    assert_eq!(app.locations().len(), 3);

    backend.reset().await;
    Mock::given(method("GET"))
        .and(path("/weather/locations"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&backend)
        .await;

    app.refetch().await;

    assert_eq!(app.locations().len(), 3);
    assert_eq!(
        app.fetch_error(),
        Some("The server is experiencing issues. Please try again later.")
    );
    assert_eq!(app.metrics(Utc::now()).health, SystemHealth::Degraded);
}

#[tokio::test]
async fn test_toggle_favorite_sends_partial_update() {
    let (backend, mut app) = start().await;

    Mock::given(method("GET"))
        .and(path("/preferences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .mount(&backend)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(locations_body()))
        .mount(&backend)
        .await;

    // Location 1 is currently a favorite, so the toggle sends false.
    Mock::given(method("PUT"))
        .and(path("/weather/locations/1"))
        .and(wiremock::matchers::body_json(json!({ "isFavorite": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "locationId": 1,
            "locationName": "Cape Town",
            "displayName": "Cape Town, ZA",
            "country": "ZA",
            "isFavorite": false
        })))
        .expect(1)
        .mount(&backend)
        .await;

    app.load().await;
    app.toggle_favorite(1).await.unwrap();
}
