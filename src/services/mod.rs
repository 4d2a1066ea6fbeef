// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod extraction;
pub mod gemini;
pub mod locations;
pub mod locks;
pub mod places;
pub mod platform;
pub mod processor;
pub mod scrape_creators;
pub mod users;

pub use extraction::{ContentExtractor, Extraction, ProviderExtractor};
pub use gemini::GeminiClient;
pub use locations::LocationPipeline;
pub use places::PlacesClient;
pub use processor::{MessageProcessor, ProcessOutcome};
pub use scrape_creators::ScrapeCreatorsClient;
pub use users::{ProcessingStatus, UserService};
