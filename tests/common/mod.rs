// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use headstart_backend::config::Config;
use headstart_backend::db::{DocumentStore, FirestoreDb, MemoryStore};
use headstart_backend::error::AppError;
use headstart_backend::models::location::UNKNOWN;
use headstart_backend::models::{Content, Location, Platform};
use headstart_backend::routes::create_router;
use headstart_backend::services::{ContentExtractor, Extraction};
use headstart_backend::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Extractor that never leaves the process.
///
/// Every URL yields the configured locations (stamped with that URL) and
/// each call is counted.
#[derive(Default)]
pub struct FakeExtractor {
    pub calls: AtomicUsize,
    locations: Mutex<Vec<Location>>,
    fail: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl FakeExtractor {
    pub fn with_locations(locations: Vec<Location>) -> Self {
        Self {
            locations: Mutex::new(locations),
            ..Self::default()
        }
    }

    /// Make every call fail with an upstream error.
    pub fn failing(message: &str) -> Self {
        Self {
            fail: Mutex::new(Some(message.to_string())),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentExtractor for FakeExtractor {
    async fn extract(&self, platform: Platform, url: &str) -> Result<Extraction, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail.lock().unwrap().clone() {
            return Err(AppError::Upstream(message));
        }

        let locations = self
            .locations
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(|mut l| {
                l.source_link = url.to_string();
                l
            })
            .collect();

        Ok(Extraction {
            content: Content {
                title: Some(format!("A {} video", platform)),
                author: Some("Travel Channel".to_string()),
                transcript: Some("We ate at Dishoom then walked to Borough Market".to_string()),
                ..Content::default()
            },
            locations,
        })
    }
}

/// A location with the given name and city.
#[allow(dead_code)]
pub fn location(name: &str, city: &str, geo: [f64; 2]) -> Location {
    Location {
        poi_name: name.to_string(),
        category: "Eats".to_string(),
        geo_location: geo,
        maps_url: format!("https://maps.google.com/?q={}", name),
        website_url: UNKNOWN.to_string(),
        photos_links: vec![],
        city: city.to_string(),
        tgid: None,
        source_link: String::new(),
        added_at: "2026-01-01T00:00:00.000Z".to_string(),
    }
}

/// Test app over in-memory storage.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: MemoryStore,
    pub extractor: Arc<FakeExtractor>,
}

/// Create a test app with in-memory storage and the given extractor.
#[allow(dead_code)]
pub fn create_test_app_with(extractor: FakeExtractor) -> TestApp {
    let store = MemoryStore::new();
    let extractor = Arc::new(extractor);
    let db: Arc<dyn DocumentStore> = Arc::new(store.clone());

    let state = Arc::new(AppState::new(
        Config::test_default(),
        db,
        extractor.clone(),
    ));

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        extractor,
    }
}

/// Create a test app whose extractor returns two London locations.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(FakeExtractor::with_locations(vec![
        location("Dishoom", "London, UK", [51.5126, -0.1263]),
        location("Borough Market", "London, UK", [51.5055, -0.0910]),
    ]))
}

/// Create a test app backed by an offline Firestore client.
#[allow(dead_code)]
pub fn create_offline_app() -> axum::Router {
    let db: Arc<dyn DocumentStore> = Arc::new(FirestoreDb::new_mock());
    let state = Arc::new(AppState::new(
        Config::test_default(),
        db,
        Arc::new(FakeExtractor::default()),
    ));
    create_router(state)
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A bot message body from `wa_id` with the given text.
#[allow(dead_code)]
pub fn bot_message(wa_id: &str, sender_name: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "6512",
        "created": "2026-01-01T00:00:00Z",
        "whatsappMessageId": "wamid.HBgM",
        "conversationId": "conv-1",
        "ticketId": "ticket-1",
        "text": text,
        "type": "text",
        "data": null,
        "timestamp": "1767225600",
        "owner": false,
        "eventType": "message",
        "statusString": "SENT",
        "waId": wa_id,
        "senderName": sender_name,
        "sourceType": 0,
        "forwarded": false
    })
}
