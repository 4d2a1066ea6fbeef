// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Backed by `DashMap`, so each per-key update runs under that key's shard
//! lock. Used by tests and by `STORAGE_BACKEND=memory` for local runs.

use super::{CachedLinkMerge, DocumentStore};
use crate::error::AppError;
use crate::models::{CachedLink, Location, User, UserLink};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<String, User>>,
    links: Arc<DashMap<String, CachedLink>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn cached_link_count(&self) -> usize {
        self.links.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_user(&self, phone_no: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(phone_no).map(|u| u.clone()))
    }

    async fn ensure_user(
        &self,
        phone_no: &str,
        name: &str,
        now: &str,
    ) -> Result<bool, AppError> {
        match self.users.entry(phone_no.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(User::new(name, phone_no, now));
                tracing::info!(phone_no, "Created user");
                Ok(true)
            }
        }
    }

    async fn append_to_user(
        &self,
        phone_no: &str,
        name: &str,
        link: UserLink,
        locations: Vec<Location>,
        now: &str,
    ) -> Result<(), AppError> {
        let mut user = self
            .users
            .entry(phone_no.to_string())
            .or_insert_with(|| User::new(name, phone_no, now));
        user.append(link, locations, now);
        Ok(())
    }

    async fn get_cached_link(&self, url: &str) -> Result<Option<CachedLink>, AppError> {
        Ok(self.links.get(url).map(|l| l.clone()))
    }

    async fn upsert_cached_link(
        &self,
        url: &str,
        merge: CachedLinkMerge,
    ) -> Result<CachedLink, AppError> {
        let merged = match self.links.entry(url.to_string()) {
            Entry::Occupied(mut slot) => {
                let merged = (*merge)(Some(slot.get().clone()));
                slot.insert(merged.clone());
                merged
            }
            Entry::Vacant(slot) => slot.insert((*merge)(None)).clone(),
        };
        Ok(merged)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
