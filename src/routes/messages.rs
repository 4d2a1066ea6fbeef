// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Inbound WhatsApp bot messages.

use crate::error::Result;
use crate::models::{Content, Location, Platform, WhatsAppMessage};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/process-message", post(process_message))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProcessMessageResponse {
    pub success: bool,
    pub message: String,
    pub link: String,
    pub platform: Platform,
    pub cached: bool,
    pub processed_count: u64,
    pub author: Option<String>,
    /// Present only when the provider was called for this request.
    ///
    /// The link cache memoizes author and locations but not content, so a
    /// cache hit (`cached: true`) omits this field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    pub locations: Vec<Location>,
    pub name: String,
    #[serde(rename = "phoneNo")]
    pub phone_no: String,
}

/// Process a message from the bot platform.
///
/// The first URL in the text is extracted and resolved through the link
/// cache, and the link plus its geocoded locations land on the sender.
async fn process_message(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<WhatsAppMessage>, JsonRejection>,
) -> Result<Json<ProcessMessageResponse>> {
    let Json(message) = payload?;
    let outcome = state.processor.process(&message).await?;

    let summary = if outcome.cached {
        format!(
            "Link already processed {} times, returned cached locations",
            outcome.processed_count
        )
    } else {
        format!(
            "Processed {} link with {} locations",
            outcome.platform,
            outcome.locations.len()
        )
    };

    Ok(Json(ProcessMessageResponse {
        success: true,
        message: summary,
        link: outcome.url,
        platform: outcome.platform,
        cached: outcome.cached,
        processed_count: outcome.processed_count,
        author: outcome.author,
        content: outcome.content,
        locations: outcome.locations,
        name: message.sender_name,
        phone_no: message.wa_id,
    }))
}
