// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login and per-user read routes.
//!
//! The phone number is the only identity; there is no token or session.

use crate::error::{AppError, Result};
use crate::models::{Location, UserLink};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// User routes, mounted under the API prefix.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/getCities", post(get_cities))
        .route("/getPois", post(get_pois))
        .route("/getLinks", post(get_links))
        .route("/processing-status/{phone_no}", get(processing_status))
}

/// Unwrap a JSON body and run its validation rules.
fn validated<T: Validate>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    let Json(body) = payload?;
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(body)
}

// ─── Login ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(rename = "phoneNo")]
    #[validate(length(min = 1, max = 32, message = "phoneNo must be 1-32 characters"))]
    pub phone_no: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user_exists: bool,
    pub name: String,
    #[serde(rename = "phoneNo")]
    pub phone_no: String,
}

/// Log in, creating the user on first contact.
async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let req = validated(payload)?;
    let user_exists = state.users.login(req.name.trim(), &req.phone_no).await?;

    let message = if user_exists {
        "User already exists"
    } else {
        "User created successfully"
    };

    Ok(Json(LoginResponse {
        success: true,
        message: message.to_string(),
        user_exists,
        name: req.name,
        phone_no: req.phone_no,
    }))
}

// ─── Projections ─────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct PhoneRequest {
    #[serde(rename = "phoneNo")]
    #[validate(length(min = 1, max = 32, message = "phoneNo must be 1-32 characters"))]
    pub phone_no: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CitiesResponse {
    pub success: bool,
    #[serde(rename = "phoneNo")]
    pub phone_no: String,
    pub cities: Vec<String>,
    pub total_cities: usize,
    pub message: String,
}

async fn get_cities(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PhoneRequest>, JsonRejection>,
) -> Result<Json<CitiesResponse>> {
    let req = validated(payload)?;
    let cities = state.users.cities(&req.phone_no).await?;

    tracing::debug!(phone_no = %req.phone_no, count = cities.len(), "Fetched cities");

    Ok(Json(CitiesResponse {
        success: true,
        message: format!("Found {} unique cities", cities.len()),
        total_cities: cities.len(),
        cities,
        phone_no: req.phone_no,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PoisResponse {
    pub success: bool,
    #[serde(rename = "phoneNo")]
    pub phone_no: String,
    pub pois: Vec<Location>,
    pub total_pois: usize,
    pub message: String,
}

async fn get_pois(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PhoneRequest>, JsonRejection>,
) -> Result<Json<PoisResponse>> {
    let req = validated(payload)?;
    let pois = state.users.pois(&req.phone_no).await?;

    Ok(Json(PoisResponse {
        success: true,
        message: format!("Found {} POIs", pois.len()),
        total_pois: pois.len(),
        pois,
        phone_no: req.phone_no,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LinksResponse {
    pub success: bool,
    #[serde(rename = "phoneNo")]
    pub phone_no: String,
    pub links: Vec<LinkData>,
    pub total_links: usize,
    pub message: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LinkData {
    pub url: String,
    pub added_at: String,
}

impl From<UserLink> for LinkData {
    fn from(link: UserLink) -> Self {
        Self {
            url: link.url,
            added_at: link.added_at,
        }
    }
}

async fn get_links(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PhoneRequest>, JsonRejection>,
) -> Result<Json<LinksResponse>> {
    let req = validated(payload)?;
    let links: Vec<LinkData> = state
        .users
        .links(&req.phone_no)
        .await?
        .into_iter()
        .map(LinkData::from)
        .collect();

    Ok(Json(LinksResponse {
        success: true,
        message: format!("Found {} links", links.len()),
        total_links: links.len(),
        links,
        phone_no: req.phone_no,
    }))
}

// ─── Processing Status ───────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProcessingStatusResponse {
    pub success: bool,
    pub phone_no: String,
    pub latest_link: Option<LinkData>,
    /// Newest first
    pub recent_locations: Vec<Location>,
    pub total_links: usize,
    pub total_locations: usize,
    pub message: String,
}

async fn processing_status(
    State(state): State<Arc<AppState>>,
    Path(phone_no): Path<String>,
) -> Result<Json<ProcessingStatusResponse>> {
    // Same rules as the `phoneNo` body field
    let req = PhoneRequest { phone_no };
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let PhoneRequest { phone_no } = req;

    let status = state.users.processing_status(&phone_no).await?;

    Ok(Json(ProcessingStatusResponse {
        success: true,
        message: format!(
            "User has {} links and {} locations",
            status.total_links, status.total_locations
        ),
        phone_no,
        latest_link: status.latest_link.map(LinkData::from),
        recent_locations: status.recent_locations,
        total_links: status.total_links,
        total_locations: status.total_locations,
    }))
}
