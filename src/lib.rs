// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Headstart: WhatsApp link relay for travel content
//!
//! This crate provides the backend API that turns YouTube and Instagram links
//! shared with the WhatsApp bot into per-user lists of places to visit.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::DocumentStore;
use services::{ContentExtractor, MessageProcessor, UserService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn DocumentStore>,
    pub users: UserService,
    pub processor: MessageProcessor,
}

impl AppState {
    /// Wire services over a store and an extractor.
    pub fn new(
        config: Config,
        db: Arc<dyn DocumentStore>,
        extractor: Arc<dyn ContentExtractor>,
    ) -> Self {
        let users = UserService::new(db.clone(), config.recent_locations_window);
        let processor = MessageProcessor::new(db.clone(), extractor);

        Self {
            config,
            db,
            users,
            processor,
        }
    }
}
