// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User store operations: login and read projections.

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::{Location, User, UserLink};
use crate::time_utils::now_rfc3339;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Snapshot returned by the processing-status projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingStatus {
    pub latest_link: Option<UserLink>,
    /// Newest first
    pub recent_locations: Vec<Location>,
    pub total_links: usize,
    pub total_locations: usize,
}

/// Login and projections over the user collection.
#[derive(Clone)]
pub struct UserService {
    db: Arc<dyn DocumentStore>,
    recent_window: usize,
}

impl UserService {
    pub fn new(db: Arc<dyn DocumentStore>, recent_window: usize) -> Self {
        Self { db, recent_window }
    }

    /// Create the user if unseen. Returns `true` if the user already existed.
    pub async fn login(&self, name: &str, phone_no: &str) -> Result<bool> {
        let created = self.db.ensure_user(phone_no, name, &now_rfc3339()).await?;
        tracing::info!(phone_no, created, "Login");
        Ok(!created)
    }

    async fn require_user(&self, phone_no: &str) -> Result<User> {
        self.db
            .get_user(phone_no)
            .await?
            .ok_or_else(|| AppError::UserNotFound {
                phone_no: phone_no.to_string(),
            })
    }

    pub async fn cities(&self, phone_no: &str) -> Result<Vec<String>> {
        Ok(unique_cities(&self.require_user(phone_no).await?))
    }

    pub async fn pois(&self, phone_no: &str) -> Result<Vec<Location>> {
        Ok(self.require_user(phone_no).await?.locations)
    }

    pub async fn links(&self, phone_no: &str) -> Result<Vec<UserLink>> {
        Ok(self.require_user(phone_no).await?.links)
    }

    pub async fn processing_status(&self, phone_no: &str) -> Result<ProcessingStatus> {
        let user = self.require_user(phone_no).await?;
        Ok(processing_status(user, self.recent_window))
    }
}

/// Distinct, non-empty city names in alphabetical order.
pub fn unique_cities(user: &User) -> Vec<String> {
    user.locations
        .iter()
        .map(|l| l.city.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Latest link, newest `window` locations, and totals.
pub fn processing_status(mut user: User, window: usize) -> ProcessingStatus {
    let total_links = user.links.len();
    let total_locations = user.locations.len();

    let recent_locations = user
        .locations
        .drain(total_locations.saturating_sub(window)..)
        .rev()
        .collect();

    ProcessingStatus {
        latest_link: user.links.pop(),
        recent_locations,
        total_links,
        total_locations,
    }
}
