// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Global link cache record.

use serde::{Deserialize, Serialize};

use super::Location;

/// Memoized extraction result for one URL, shared by all users.
///
/// There is no expiry: once a URL is cached, later submissions only bump
/// `processed_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLink {
    /// The content URL (document id is its URL-encoded form)
    pub link: String,
    /// Channel or account that published the content, if known
    pub author: Option<String>,
    /// Every location extracted for this URL
    #[serde(default)]
    pub locations: Vec<Location>,
    /// First successful extraction (RFC3339)
    pub processed_at: String,
    /// Number of submissions of this URL across all users
    pub processed_count: u64,
}

impl CachedLink {
    /// Record for a URL that was just extracted for the first time.
    pub fn first_seen(
        link: &str,
        author: Option<String>,
        locations: Vec<Location>,
        now: &str,
    ) -> Self {
        Self {
            link: link.to_string(),
            author,
            locations,
            processed_at: now.to_string(),
            processed_count: 1,
        }
    }

    /// Merge a new submission into an existing record.
    ///
    /// Stored locations win; a missing author is filled in from the newer
    /// result.
    pub fn merge_submission(mut self, author: Option<String>) -> Self {
        self.processed_count += 1;
        if self.author.is_none() {
            self.author = author;
        }
        self
    }
}
