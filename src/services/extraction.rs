// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content extraction: provider fetch plus location extraction for one URL.

use crate::error::AppError;
use crate::models::{Content, Location, Platform};
use crate::services::gemini::TimedText;
use crate::services::locations::LocationPipeline;
use crate::services::scrape_creators::ScrapeCreatorsClient;
use crate::time_utils::now_rfc3339;
use async_trait::async_trait;

/// Result of extracting one URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub content: Content,
    /// Locations stamped with the URL as `source_link`; may be empty
    pub locations: Vec<Location>,
}

/// Fetches content and derived locations for a classified URL.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, platform: Platform, url: &str) -> Result<Extraction, AppError>;
}

/// Extractor backed by ScrapeCreators and the location pipeline.
#[derive(Clone)]
pub struct ProviderExtractor {
    scrape: ScrapeCreatorsClient,
    locations: LocationPipeline,
}

impl ProviderExtractor {
    pub fn new(scrape: ScrapeCreatorsClient, locations: LocationPipeline) -> Self {
        Self { scrape, locations }
    }
}

#[async_trait]
impl ContentExtractor for ProviderExtractor {
    async fn extract(&self, platform: Platform, url: &str) -> Result<Extraction, AppError> {
        let now = now_rfc3339();

        match platform {
            Platform::YouTube => {
                let video = self.scrape.fetch_youtube(url).await?;
                let content = Content::from(&video);
                let segments: Vec<TimedText<'_>> = video
                    .segments()
                    .iter()
                    .map(|s| TimedText {
                        text: &s.text,
                        start_time_text: &s.start_time_text,
                    })
                    .collect();

                let locations = self.locations.extract(&content, &segments, url, &now).await;
                Ok(Extraction { content, locations })
            }
            Platform::Instagram => {
                let body = self.scrape.fetch_instagram(url).await?;
                let content = Content::from(&body);
                let locations = self.locations.extract(&content, &[], url, &now).await;
                Ok(Extraction { content, locations })
            }
            Platform::Unsupported => Err(AppError::UnsupportedPlatform {
                url: url.to_string(),
            }),
        }
    }
}
