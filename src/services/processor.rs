// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! WhatsApp message processing.
//!
//! Handles the core workflow:
//! 1. Extract the URL from the message text and classify its platform
//! 2. Serve from the link cache, or extract on a miss
//! 3. Upsert the link cache record
//! 4. Append the link and its locations to the sender

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::{CachedLink, Content, Location, Platform, UserLink, WhatsAppMessage};
use crate::services::extraction::ContentExtractor;
use crate::services::locks::KeyedLocks;
use crate::services::platform::{classify, extract_url};
use crate::time_utils::now_rfc3339;
use std::sync::Arc;
use validator::Validate;

/// Result of processing one message.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    pub url: String,
    pub platform: Platform,
    /// True when the link cache answered and the provider was not called
    pub cached: bool,
    /// Fresh content on a miss; `None` on a cache hit
    pub content: Option<Content>,
    pub author: Option<String>,
    /// All locations known for the URL
    pub locations: Vec<Location>,
    pub processed_count: u64,
}

/// Message processor shared by all requests.
#[derive(Clone)]
pub struct MessageProcessor {
    db: Arc<dyn DocumentStore>,
    extractor: Arc<dyn ContentExtractor>,
    url_locks: KeyedLocks,
    user_locks: KeyedLocks,
}

impl MessageProcessor {
    pub fn new(db: Arc<dyn DocumentStore>, extractor: Arc<dyn ContentExtractor>) -> Self {
        Self {
            db,
            extractor,
            url_locks: KeyedLocks::new(),
            user_locks: KeyedLocks::new(),
        }
    }

    /// Process a bot message end to end.
    pub async fn process(&self, message: &WhatsAppMessage) -> Result<ProcessOutcome> {
        message
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let url = extract_url(&message.text).ok_or(AppError::NoUrlFound)?;
        let platform = classify(&url);

        tracing::info!(
            wa_id = %message.wa_id,
            url = %url,
            platform = %platform,
            event_type = message.event_type.as_deref().unwrap_or("unknown"),
            "Processing message"
        );

        if platform == Platform::Unsupported {
            return Err(AppError::UnsupportedPlatform { url });
        }

        let (cached_link, content, was_cached) = self.resolve_link(&url, platform).await?;

        // The sender keeps only geocoded locations; the cache keeps all of them
        let user_locations: Vec<Location> = cached_link
            .locations
            .iter()
            .filter(|l| l.has_coordinates())
            .cloned()
            .collect();

        let name = if message.sender_name.trim().is_empty() {
            message.wa_id.as_str()
        } else {
            message.sender_name.trim()
        };
        let now = now_rfc3339();

        {
            let _guard = self.user_locks.lock(&message.wa_id).await;
            self.db
                .append_to_user(
                    &message.wa_id,
                    name,
                    UserLink {
                        url: url.clone(),
                        added_at: now.clone(),
                    },
                    user_locations,
                    &now,
                )
                .await?;
        }

        tracing::info!(
            wa_id = %message.wa_id,
            url = %url,
            cached = was_cached,
            locations = cached_link.locations.len(),
            processed_count = cached_link.processed_count,
            "Message processed"
        );

        Ok(ProcessOutcome {
            url,
            platform,
            cached: was_cached,
            content,
            author: cached_link.author,
            locations: cached_link.locations,
            processed_count: cached_link.processed_count,
        })
    }

    /// Cache lookup and (on a miss) extraction, serialized per URL.
    async fn resolve_link(
        &self,
        url: &str,
        platform: Platform,
    ) -> Result<(CachedLink, Option<Content>, bool)> {
        let _guard = self.url_locks.lock(url).await;

        if let Some(existing) = self.db.get_cached_link(url).await? {
            tracing::debug!(url, "Link cache hit");
            let merged = self
                .db
                .upsert_cached_link(
                    url,
                    Arc::new(move |current| {
                        current
                            .unwrap_or_else(|| existing.clone())
                            .merge_submission(None)
                    }),
                )
                .await?;
            return Ok((merged, None, true));
        }

        tracing::debug!(url, platform = %platform, "Link cache miss, calling provider");
        let extraction = self.extractor.extract(platform, url).await?;

        let link = url.to_string();
        let author = extraction.content.author.clone();
        let locations = extraction.locations;
        let now = now_rfc3339();

        let merged = self
            .db
            .upsert_cached_link(
                url,
                Arc::new(move |current| match current {
                    // Another instance cached it first
                    Some(existing) => existing.merge_submission(author.clone()),
                    None => CachedLink::first_seen(&link, author.clone(), locations.clone(), &now),
                }),
            )
            .await?;

        Ok((merged, Some(extraction.content), false))
    }
}
