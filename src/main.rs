// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Headstart API Server
//!
//! Receives YouTube and Instagram links from the WhatsApp bot, extracts the
//! places they mention, and serves each user's saved places to the app.

use headstart_backend::{
    config::{Config, StorageBackend},
    db::{DocumentStore, FirestoreDb, MemoryStore},
    services::{GeminiClient, LocationPipeline, PlacesClient, ProviderExtractor, ScrapeCreatorsClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting Headstart API"
    );

    // Initialize document store
    let db: Arc<dyn DocumentStore> = match config.storage_backend {
        StorageBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
        StorageBackend::Memory => {
            if config.is_production() {
                tracing::warn!("In-memory storage in production; data is lost on restart");
            }
            tracing::info!("Using in-memory document store");
            Arc::new(MemoryStore::new())
        }
    };

    // Extraction provider
    let scrape = ScrapeCreatorsClient::new(
        config.scrape_creators_api_key.clone(),
        config.youtube_api_url.clone(),
        config.instagram_api_url.clone(),
        config.request_timeout,
    )?;

    // Location extraction is optional; each client needs its own key
    let mentions = config
        .google_api_key
        .clone()
        .map(|key| GeminiClient::new(key, config.gemini_model.clone(), config.request_timeout))
        .transpose()?;
    let places = config
        .google_maps_api_key
        .clone()
        .map(|key| PlacesClient::new(key, config.request_timeout))
        .transpose()?;
    let extractor = Arc::new(ProviderExtractor::new(
        scrape,
        LocationPipeline::new(mentions, places),
    ));

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db, extractor));

    // Build router
    let app = headstart_backend::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("headstart_backend=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
