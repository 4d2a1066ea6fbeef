// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Maps client: geocoding plus place details.

use crate::error::AppError;
use crate::models::PhotoLink;
use serde::Deserialize;
use std::time::Duration;

const MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
const PLACE_DETAIL_FIELDS: &str = "name,formatted_address,photo,url,website";
const MAX_PHOTOS: usize = 3;
const PHOTO_MAX_WIDTH: u32 = 400;

/// Resolved place for one mention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetails {
    /// `[lat, lng]`
    pub coordinates: [f64; 2],
    pub place_id: Option<String>,
    pub maps_url: Option<String>,
    pub website: Option<String>,
    pub photos: Vec<PhotoLink>,
}

/// Google Geocoding + Places REST client.
#[derive(Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl PlacesClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            base_url: MAPS_BASE_URL.to_string(),
        })
    }

    /// Client whose every request fails to connect.
    #[cfg(test)]
    pub(crate) fn unreachable_for_tests() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: "SECRET_MAPS_KEY".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
        }
    }

    /// Geocode a place name and enrich it with place details.
    ///
    /// Returns `Ok(None)` when geocoding finds nothing. A failed details lookup
    /// still returns the geocoded coordinates.
    pub async fn lookup(&self, query: &str) -> Result<Option<PlaceDetails>, AppError> {
        let geocode: GeocodeResponse = self
            .get_json(
                "geocode/json",
                &[("address", query), ("key", self.api_key.as_str())],
            )
            .await?;

        let Some(first) = geocode.results.into_iter().next() else {
            tracing::debug!(query, status = %geocode.status, "No geocoding result");
            return Ok(None);
        };

        let mut details = PlaceDetails {
            coordinates: [first.geometry.location.lat, first.geometry.location.lng],
            place_id: first.place_id,
            ..Default::default()
        };

        let Some(place_id) = details.place_id.clone() else {
            return Ok(Some(details));
        };

        match self.place_details(&place_id).await {
            Ok(place) => {
                details.maps_url = place.url;
                details.website = place.website;
                details.photos = place
                    .photos
                    .into_iter()
                    .take(MAX_PHOTOS)
                    .map(|p| PhotoLink {
                        url: self.photo_url(&p.photo_reference),
                        photo_reference: p.photo_reference,
                        width: p.width,
                        height: p.height,
                    })
                    .collect();
            }
            Err(e) => {
                tracing::warn!(query, place_id = %place_id, error = %e, "Place details lookup failed");
            }
        }

        Ok(Some(details))
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceResult, AppError> {
        let response: PlaceDetailsResponse = self
            .get_json(
                "place/details/json",
                &[
                    ("place_id", place_id),
                    ("fields", PLACE_DETAIL_FIELDS),
                    ("key", self.api_key.as_str()),
                ],
            )
            .await?;

        if response.status != "OK" {
            return Err(AppError::Upstream(format!(
                "Places API error: {}",
                response.status
            )));
        }

        response
            .result
            .ok_or_else(|| AppError::Upstream("Places API returned no result".to_string()))
    }

    /// Places Photo request URL without credentials.
    ///
    /// Stored and returned as-is; clients append `&key=<their key>` to fetch.
    fn photo_url(&self, reference: &str) -> String {
        format!(
            "{}/place/photo?maxwidth={}&photoreference={}",
            self.base_url,
            PHOTO_MAX_WIDTH,
            urlencoding::encode(reference)
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                // The geocoding API only takes the key as a query parameter
                AppError::Upstream(format!("Google Maps request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("Google Maps HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| {
                AppError::Upstream(format!("Google Maps JSON parse error: {}", e.without_url()))
            })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct PlaceDetailsResponse {
    result: Option<PlaceResult>,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    url: Option<String>,
    website: Option<String>,
    // Details responses name the array `photos` even though the field mask says `photo`
    #[serde(default)]
    photos: Vec<PlacePhoto>,
}

#[derive(Debug, Deserialize)]
struct PlacePhoto {
    photo_reference: String,
    width: Option<u32>,
    height: Option<u32>,
}
