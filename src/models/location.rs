// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Point-of-interest model shared by users and the link cache.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Placeholder used by the extraction pipeline for unknown text fields.
pub const UNKNOWN: &str = "Unknown";

/// A point of interest discovered in a piece of content.
///
/// The same value is written to the link cache and to the requesting user,
/// so both copies compare equal field for field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Location {
    pub poi_name: String,
    /// One of the fixed categories (Eats, Attractions, Stay, ...)
    pub category: String,
    /// `[lat, lng]`; `[0.0, 0.0]` when geocoding found nothing
    pub geo_location: [f64; 2],
    pub maps_url: String,
    pub website_url: String,
    #[serde(default)]
    pub photos_links: Vec<PhotoLink>,
    pub city: String,
    /// External product/place identifier (partner catalogue)
    pub tgid: Option<String>,
    /// URL of the content this location was extracted from
    pub source_link: String,
    /// RFC3339 timestamp of discovery
    pub added_at: String,
}

impl Location {
    /// True unless the coordinates are the `[0, 0]` placeholder.
    pub fn has_coordinates(&self) -> bool {
        self.geo_location != [0.0, 0.0]
    }
}

/// A photo reference returned by place details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PhotoLink {
    pub photo_reference: String,
    /// Places Photo request without an API key. Append `&key=<key>` to fetch;
    /// the server's Maps key is never stored or returned.
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}
