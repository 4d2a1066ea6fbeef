// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location extraction pipeline.
//!
//! 1. Ask Gemini for place mentions in the transcript
//! 2. Geocode each mention and fetch place details (if a Maps key is set)
//! 3. Merge both into `Location` records stamped with the source link
//!
//! Failures in either step degrade to fewer or less detailed locations; they
//! never fail content processing.

use crate::models::location::UNKNOWN;
use crate::models::{Content, Location};
use crate::services::gemini::{GeminiClient, PlaceMention, TimedText, DEFAULT_CATEGORY};
use crate::services::places::{PlaceDetails, PlacesClient};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Turns transcript text into locations.
#[derive(Clone, Default)]
pub struct LocationPipeline {
    mentions: Option<GeminiClient>,
    places: Option<PlacesClient>,
}

impl LocationPipeline {
    pub fn new(mentions: Option<GeminiClient>, places: Option<PlacesClient>) -> Self {
        if mentions.is_none() {
            tracing::warn!("GOOGLE_API_KEY not set, location extraction disabled");
        } else if places.is_none() {
            tracing::warn!("GOOGLE_MAPS_API_KEY not set, locations will not be geocoded");
        }
        Self { mentions, places }
    }

    /// Extract locations from fetched content.
    ///
    /// Returns an empty list when extraction is disabled, the transcript is
    /// empty, or the model call fails.
    pub async fn extract(
        &self,
        content: &Content,
        segments: &[TimedText<'_>],
        source_link: &str,
        now: &str,
    ) -> Vec<Location> {
        let Some(gemini) = &self.mentions else {
            return Vec::new();
        };
        let Some(transcript) = content.transcript.as_deref().filter(|_| content.has_transcript())
        else {
            tracing::debug!(source_link, "No transcript, skipping location extraction");
            return Vec::new();
        };

        let mentions = match gemini.find_mentions(transcript, segments).await {
            Ok(mentions) => mentions,
            Err(e) => {
                tracing::warn!(source_link, error = %e, "Location mention extraction failed");
                return Vec::new();
            }
        };

        tracing::info!(source_link, mentions = mentions.len(), "Found place mentions");

        let details = self.lookup_all(&mentions).await;

        mentions
            .into_iter()
            .zip(details)
            .map(|(mention, details)| build_location(mention, details, source_link, now))
            .collect()
    }

    /// Look up every mention, keeping input order.
    async fn lookup_all(&self, mentions: &[PlaceMention]) -> Vec<Option<PlaceDetails>> {
        let Some(places) = &self.places else {
            return vec![None; mentions.len()];
        };

        // Owned names keep the stream future Send for any borrow of `mentions`
        let names: Vec<String> = mentions.iter().map(|m| m.name.clone()).collect();

        stream::iter(names)
            .map(|name| async move {
                match places.lookup(&name).await {
                    Ok(details) => details,
                    Err(e) => {
                        tracing::warn!(place = %name, error = %e, "Geocoding failed");
                        None
                    }
                }
            })
            .buffered(MAX_CONCURRENT_LOOKUPS)
            .collect()
            .await
    }
}

/// Merge a model mention with its (optional) place details.
pub fn build_location(
    mention: PlaceMention,
    details: Option<PlaceDetails>,
    source_link: &str,
    now: &str,
) -> Location {
    let details = details.unwrap_or_default();

    Location {
        poi_name: mention.name,
        category: mention
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        geo_location: details.coordinates,
        maps_url: details.maps_url.unwrap_or_else(|| UNKNOWN.to_string()),
        website_url: details.website.unwrap_or_else(|| UNKNOWN.to_string()),
        photos_links: details.photos,
        city: mention
            .location
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        tgid: None,
        source_link: source_link.to_string(),
        added_at: now.to_string(),
    }
}
