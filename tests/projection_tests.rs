// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read projections: cities, POIs, links, and processing status.

use axum::http::StatusCode;
use headstart_backend::db::DocumentStore;
use headstart_backend::models::UserLink;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, bot_message, get, location, post_json, FakeExtractor, TestApp};

const VIDEO_URL: &str = "https://youtube.com/watch?v=abc123";

async fn submit(app: &TestApp, wa_id: &str, text: &str) {
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/process-message",
            bot_message(wa_id, "Asha", text),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_user_is_404_everywhere() {
    let app = common::create_test_app();

    for uri in ["/api/v1/getCities", "/api/v1/getPois", "/api/v1/getLinks"] {
        let response = app
            .router
            .clone()
            .oneshot(post_json(uri, json!({"phoneNo": "+000"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "User not found");
        assert_eq!(json["phone_no"], "+000");
    }

    let response = app
        .router
        .oneshot(get("/api/v1/processing-status/+000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_get_links_after_one_submission() {
    let app = common::create_test_app();
    submit(&app, "+1234567890", "check this out https://youtube.com/watch?v=abc123").await;

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/getLinks",
            json!({"phoneNo": "+1234567890"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["total_links"], 1);
    let links = json["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["url"], VIDEO_URL);
    assert!(links[0]["added_at"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_get_links_for_fresh_login_is_empty() {
    let app = common::create_test_app();
    app.store.ensure_user("+1", "Asha", "t0").await.unwrap();

    let response = app
        .router
        .oneshot(post_json("/api/v1/getLinks", json!({"phoneNo": "+1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_links"], 0);
    assert_eq!(json["links"], json!([]));
}

#[tokio::test]
async fn test_get_cities_is_distinct_and_sorted() {
    let app = common::create_test_app_with(FakeExtractor::with_locations(vec![
        location("Dishoom", "London, UK", [51.5, -0.1]),
        location("Le Comptoir", "Paris, France", [48.8, 2.3]),
        location("Borough Market", "London, UK", [51.5, -0.09]),
    ]));
    submit(&app, "+1", VIDEO_URL).await;
    submit(&app, "+1", "https://youtu.be/other").await;

    let response = app
        .router
        .oneshot(post_json("/api/v1/getCities", json!({"phoneNo": "+1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["cities"], json!(["London, UK", "Paris, France"]));
    assert_eq!(json["total_cities"], 2);
}

#[tokio::test]
async fn test_get_pois_matches_cached_locations() {
    let app = common::create_test_app();
    submit(&app, "+1", VIDEO_URL).await;

    let response = app
        .router
        .oneshot(post_json("/api/v1/getPois", json!({"phoneNo": "+1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_pois"], 2);

    let cached = app.store.get_cached_link(VIDEO_URL).await.unwrap().unwrap();
    assert_eq!(json["pois"], serde_json::to_value(&cached.locations).unwrap());
}

#[tokio::test]
async fn test_processing_status_windows_recent_locations() {
    let app = common::create_test_app();

    for i in 0..5 {
        let locations = (0..3)
            .map(|j| {
                let mut l = location(&format!("poi{}", i * 3 + j), "Lisbon, Portugal", [38.7, -9.1]);
                l.source_link = format!("https://youtu.be/v{}", i);
                l
            })
            .collect();
        app.store
            .append_to_user(
                "+1",
                "Asha",
                UserLink {
                    url: format!("https://youtu.be/v{}", i),
                    added_at: format!("2026-01-0{}T00:00:00.000Z", i + 1),
                },
                locations,
                "2026-01-05T00:00:00.000Z",
            )
            .await
            .unwrap();
    }

    let response = app
        .router
        .oneshot(get("/api/v1/processing-status/+1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["total_links"], 5);
    assert_eq!(json["total_locations"], 15);
    assert_eq!(json["latest_link"]["url"], "https://youtu.be/v4");

    let recent = json["recent_locations"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["poi_name"], "poi14");
    assert_eq!(recent[4]["poi_name"], "poi10");
}

#[tokio::test]
async fn test_projection_rejects_missing_phone() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(post_json("/api/v1/getPois", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_processing_status_rejects_overlong_phone() {
    let app = common::create_test_app();
    let phone = "9".repeat(33);

    let response = app
        .router
        .oneshot(get(&format!("/api/v1/processing-status/{}", phone)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "validation_error");
}
