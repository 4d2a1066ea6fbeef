// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod api;
pub mod messages;

use crate::AppState;
use axum::extract::State;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Versioned prefix for the JSON API.
pub const API_PREFIX: &str = "/api/v1";

const STORAGE_PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub build_id: String,
    /// "connected" or "disconnected"
    pub storage: String,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();

    let storage = match tokio::time::timeout(STORAGE_PING_TIMEOUT, state.db.ping()).await {
        Ok(Ok(())) => "connected",
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Health check: storage ping failed");
            "disconnected"
        }
        Err(_) => {
            tracing::warn!("Health check: storage ping timed out");
            "disconnected"
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Headstart Backend API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_id,
        storage: storage.to_string(),
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Callers are the bot platform and the mobile app; any origin is allowed
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .merge(api::routes())
        .merge(messages::routes());

    Router::new()
        .route("/health", get(health_check))
        .nest(API_PREFIX, api_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
