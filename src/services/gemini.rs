// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gemini client for finding place mentions in transcripts.
//!
//! Uses `generateContent` with a JSON response schema so the model returns
//! `{locations: [{name, type, location, timestamp?}]}` directly.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Fixed POI categories the model must choose from.
pub const CATEGORIES: &[&str] = &[
    "Eats",
    "Attractions",
    "Stay",
    "Shopping",
    "Nature & Parks",
    "Hidden Gems",
    "Nightlife",
];

/// Category used when the model returns nothing usable.
pub const DEFAULT_CATEGORY: &str = "Hidden Gems";

const CATEGORY_GUIDE: &str = "\
Eats: restaurants, cafes, food stalls, dessert shops, breweries, signature-dish spots. \
Attractions: museums, monuments, theme parks, landmarks, observation decks, major sights. \
Stay: hotels, hostels, resorts, rentals, guesthouses, unusual stays. \
Shopping: malls, markets, shopping streets, boutiques, artisan and specialty stores. \
Nature & Parks: national parks, beaches, trails, lakes, gardens, mountains, viewpoints. \
Hidden Gems: lesser-known local favourites and off-the-beaten-path spots. \
Nightlife: bars, clubs, night markets, late-night food, live music venues, lounges.";

const EXTRACTION_PROMPT: &str = "\
Extract every specific place the speaker visits or recommends in this travel \
video transcript: landmarks, restaurants, cafes, bars, hotels, parks and attractions.
Rules:
- Do not list cities, states, provinces or countries as separate places.
- Use the core place name suitable for geocoding, e.g. \"Royal Observatory\" rather \
than \"Greenwich Meridian Line at the Royal Observatory\".
- Merge brand and branch, e.g. \"Citizen M Tower of London\".
- Add the neighbourhood when it identifies the branch, e.g. \"Dishoom Shoreditch\".
- For each place give your best guess of \"City, Country\".";

/// A place mention returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceMention {
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: Option<String>,
    /// "City, Country"
    #[serde(default)]
    pub location: Option<String>,
    /// MM:SS, only when timestamped segments were supplied
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MentionList {
    #[serde(default)]
    locations: Vec<PlaceMention>,
}

/// Transcript segment passed to the model for timestamp matching.
#[derive(Debug, Clone, Serialize)]
pub struct TimedText<'a> {
    pub text: &'a str,
    #[serde(rename = "startTimeText")]
    pub start_time_text: &'a str,
}

/// Gemini REST client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Ask the model for place mentions in `transcript`.
    ///
    /// When `segments` is non-empty the model is also asked for a timestamp per
    /// mention.
    pub async fn find_mentions(
        &self,
        transcript: &str,
        segments: &[TimedText<'_>],
    ) -> Result<Vec<PlaceMention>, AppError> {
        let timestamped = !segments.is_empty();
        let prompt = build_prompt(transcript, segments)?;

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(timestamped),
                "temperature": 0.0
            }
        });

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::Upstream(format!("Gemini request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("Gemini HTTP {}: {}", status, text)));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                AppError::Upstream(format!("Gemini JSON parse error: {}", e.without_url()))
            })?;

        let text = reply
            .first_text()
            .ok_or_else(|| AppError::Upstream("Gemini returned no candidates".to_string()))?;

        parse_mentions(text)
    }
}

fn build_prompt(transcript: &str, segments: &[TimedText<'_>]) -> Result<String, AppError> {
    let mut prompt = format!(
        "{}\n\nCategories:\n{}\n\nFull transcript: {}\n",
        EXTRACTION_PROMPT, CATEGORY_GUIDE, transcript
    );

    if !segments.is_empty() {
        let encoded = serde_json::to_string(segments)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Segment encoding failed: {}", e)))?;
        prompt.push_str(&format!(
            "\nTimestamped segments: {}\nUse them to give the MM:SS timestamp where each place is mentioned.\n",
            encoded
        ));
    }

    Ok(prompt)
}

fn response_schema(timestamped: bool) -> serde_json::Value {
    let mut properties = json!({
        "name": { "type": "STRING", "description": "Specific name of the place" },
        "type": { "type": "STRING", "enum": CATEGORIES, "description": CATEGORY_GUIDE },
        "location": { "type": "STRING", "description": "City and country, e.g. 'London, UK'" }
    });
    let mut required = vec!["name", "type", "location"];

    if timestamped {
        properties["timestamp"] = json!({
            "type": "STRING",
            "description": "MM:SS where the place is mentioned"
        });
        required.push("timestamp");
    }

    json!({
        "type": "OBJECT",
        "properties": {
            "locations": {
                "type": "ARRAY",
                "items": { "type": "OBJECT", "properties": properties, "required": required }
            }
        },
        "required": ["locations"]
    })
}

fn parse_mentions(text: &str) -> Result<Vec<PlaceMention>, AppError> {
    let list: MentionList = serde_json::from_str(text)
        .map_err(|e| AppError::Upstream(format!("Gemini returned invalid JSON: {}", e)))?;

    Ok(list
        .locations
        .into_iter()
        .filter(|m| !m.name.trim().is_empty())
        .collect())
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.text.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mentions_skips_blank_names() {
        let text = r#"{"locations":[
            {"name":"Dishoom Shoreditch","type":"Eats","location":"London, UK"},
            {"name":"  ","type":"Eats","location":"London, UK"},
            {"name":"Sky Garden","type":"Attractions","location":"London, UK","timestamp":"03:10"}
        ]}"#;

        let mentions = parse_mentions(text).unwrap();
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].category.as_deref(), Some("Eats"));
        assert_eq!(mentions[1].timestamp.as_deref(), Some("03:10"));
    }

    #[test]
    fn test_parse_mentions_rejects_non_json() {
        assert!(matches!(
            parse_mentions("sorry, I can't"),
            Err(AppError::Upstream(_))
        ));
    }

    #[test]
    fn test_schema_requires_timestamp_only_when_timestamped() {
        let plain = response_schema(false);
        let timed = response_schema(true);
        let required = |s: &serde_json::Value| {
            s["properties"]["locations"]["items"]["required"]
                .as_array()
                .unwrap()
                .len()
        };
        assert_eq!(required(&plain), 3);
        assert_eq!(required(&timed), 4);
    }

    #[test]
    fn test_first_text_reads_first_part() {
        let reply: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"locations\":[]}" }] } }]
        }))
        .unwrap();
        assert_eq!(reply.first_text(), Some("{\"locations\":[]}"));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_key() {
        let mut client = GeminiClient::new(
            "SECRET_GEMINI_KEY".to_string(),
            "gemini-1.5-flash".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();
        client.base_url = "http://127.0.0.1:1".to_string();

        let err = client.find_mentions("we ate at Dishoom", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert!(!err.to_string().contains("SECRET_GEMINI_KEY"));
        assert!(!err.to_string().contains("key="));
    }

    #[test]
    fn test_prompt_includes_segments() {
        let segments = [TimedText {
            text: "we start at Dishoom",
            start_time_text: "0:00",
        }];
        let prompt = build_prompt("we start at Dishoom", &segments).unwrap();
        assert!(prompt.contains("Timestamped segments"));
        assert!(prompt.contains("startTimeText"));
    }
}
