// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ScrapeCreators API client for YouTube and Instagram content.
//!
//! Handles:
//! - YouTube video metadata with timestamped transcript
//! - Instagram post/reel transcripts (one per carousel item)
//! - Mapping provider failures to `AppError::Upstream`

use crate::error::AppError;
use crate::models::Content;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// ScrapeCreators API client.
#[derive(Clone)]
pub struct ScrapeCreatorsClient {
    http: reqwest::Client,
    api_key: String,
    youtube_url: String,
    instagram_url: String,
}

impl ScrapeCreatorsClient {
    pub fn new(
        api_key: String,
        youtube_url: String,
        instagram_url: String,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            youtube_url,
            instagram_url,
        })
    }

    /// Fetch video metadata and transcript.
    pub async fn fetch_youtube(&self, url: &str) -> Result<YouTubeVideo, AppError> {
        let response = self
            .http
            .get(&self.youtube_url)
            .header("x-api-key", &self.api_key)
            .query(&[("url", url), ("get_transcript", "true")])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("YouTube request failed: {}", e)))?;

        check_response_json(response, "YouTube").await
    }

    /// Fetch transcripts for an Instagram post or reel.
    pub async fn fetch_instagram(&self, url: &str) -> Result<InstagramTranscripts, AppError> {
        let response = self
            .http
            .get(&self.instagram_url)
            .header("x-api-key", &self.api_key)
            .query(&[("url", url)])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Instagram request failed: {}", e)))?;

        let body: InstagramTranscripts = check_response_json(response, "Instagram").await?;
        if !body.success {
            return Err(AppError::Upstream(
                "Instagram provider reported failure".to_string(),
            ));
        }
        Ok(body)
    }
}

/// Check response status and parse JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    platform: &str,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!(platform, "ScrapeCreators rate limit hit (429)");
        }

        return Err(AppError::Upstream(format!(
            "Failed to fetch {} data: HTTP {}: {}",
            platform,
            status,
            truncate(&body, 200)
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("{} JSON parse error: {}", platform, e)))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ─── YouTube ─────────────────────────────────────────────────

/// YouTube video response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeVideo {
    pub id: String,
    pub thumbnail: Option<String>,
    #[serde(rename = "type")]
    pub video_type: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub comment_count_text: Option<String>,
    pub comment_count_int: Option<i64>,
    pub like_count_text: Option<String>,
    pub like_count_int: Option<i64>,
    pub view_count_text: Option<String>,
    pub view_count_int: Option<i64>,
    pub publish_date_text: Option<String>,
    pub publish_date: Option<String>,
    pub channel: YouTubeChannel,
    #[serde(default)]
    pub watch_next_videos: Option<Vec<WatchNextVideo>>,
    #[serde(default)]
    pub transcript: Option<Vec<TranscriptSegment>>,
    #[serde(rename = "transcript_only_text")]
    pub transcript_only_text: Option<String>,
}

impl YouTubeVideo {
    /// Transcript segments with their display timestamps.
    pub fn segments(&self) -> &[TranscriptSegment] {
        self.transcript.as_deref().unwrap_or_default()
    }
}

impl From<&YouTubeVideo> for Content {
    fn from(video: &YouTubeVideo) -> Self {
        let author = if video.channel.title.is_empty() {
            video.channel.handle.clone()
        } else {
            video.channel.title.clone()
        };

        Content {
            title: Some(video.title.clone()),
            description: video.description.clone(),
            author: Some(author).filter(|a| !a.is_empty()),
            thumbnail: video.thumbnail.clone(),
            transcript: video.transcript_only_text.clone(),
            view_count: video.view_count_int,
            like_count: video.like_count_int,
            comment_count: video.comment_count_int,
            publish_date: video.publish_date.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeChannel {
    pub id: String,
    pub url: Option<String>,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchNextVideo {
    pub id: String,
    pub title: String,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub text: String,
    pub start_ms: Option<String>,
    pub end_ms: Option<String>,
    #[serde(default)]
    pub start_time_text: String,
}

// ─── Instagram ───────────────────────────────────────────────

/// Instagram transcript response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramTranscripts {
    pub success: bool,
    #[serde(default)]
    pub transcripts: Vec<InstagramTranscript>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramTranscript {
    pub id: String,
    pub shortcode: String,
    #[serde(default)]
    pub text: String,
}

impl From<&InstagramTranscripts> for Content {
    fn from(body: &InstagramTranscripts) -> Self {
        let transcript = body
            .transcripts
            .iter()
            .map(|t| t.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        Content {
            transcript: Some(transcript).filter(|t| !t.is_empty()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_response_normalizes() {
        let raw = serde_json::json!({
            "id": "abc123",
            "type": "video",
            "title": "48 Hours in London",
            "description": "Food and sights",
            "likeCountInt": 1200,
            "viewCountInt": 50000,
            "publishDate": "2025-06-01T00:00:00.000Z",
            "channel": {"id": "UC1", "url": "https://youtube.com/@trav", "handle": "@trav", "title": "Trav"},
            "transcript": [
                {"text": "we start at Dishoom", "startMs": "0", "endMs": "2000", "startTimeText": "0:00"}
            ],
            "transcript_only_text": "we start at Dishoom"
        });

        let video: YouTubeVideo = serde_json::from_value(raw).unwrap();
        assert_eq!(video.segments().len(), 1);

        let content = Content::from(&video);
        assert_eq!(content.title.as_deref(), Some("48 Hours in London"));
        assert_eq!(content.author.as_deref(), Some("Trav"));
        assert_eq!(content.view_count, Some(50000));
        assert_eq!(content.comment_count, None);
        assert!(content.has_transcript());
    }

    #[test]
    fn test_youtube_author_falls_back_to_handle() {
        let raw = serde_json::json!({
            "id": "x", "title": "t",
            "channel": {"id": "UC1", "handle": "@trav", "title": ""}
        });
        let video: YouTubeVideo = serde_json::from_value(raw).unwrap();
        assert_eq!(Content::from(&video).author.as_deref(), Some("@trav"));
        assert!(video.segments().is_empty());
    }

    #[test]
    fn test_instagram_carousel_transcripts_join() {
        let body = InstagramTranscripts {
            success: true,
            transcripts: vec![
                InstagramTranscript {
                    id: "1".to_string(),
                    shortcode: "C1".to_string(),
                    text: "first stop Borough Market".to_string(),
                },
                InstagramTranscript {
                    id: "2".to_string(),
                    shortcode: "C1".to_string(),
                    text: " ".to_string(),
                },
                InstagramTranscript {
                    id: "3".to_string(),
                    shortcode: "C1".to_string(),
                    text: "then Sky Garden".to_string(),
                },
            ],
        };

        let content = Content::from(&body);
        assert_eq!(
            content.transcript.as_deref(),
            Some("first stop Borough Market\n\nthen Sky Garden")
        );
        assert_eq!(content.author, None);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
