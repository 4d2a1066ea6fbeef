// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod cached_link;
pub mod content;
pub mod location;
pub mod message;
pub mod user;

pub use cached_link::CachedLink;
pub use content::{Content, Platform};
pub use location::{Location, PhotoLink};
pub use message::WhatsAppMessage;
pub use user::{User, UserLink};
