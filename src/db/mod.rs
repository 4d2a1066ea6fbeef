//! Database layer.
//!
//! Users and the global link cache live behind [`DocumentStore`]. Production
//! uses Firestore; tests and local runs can use the in-process [`MemoryStore`].

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{CachedLink, Location, User, UserLink};
use async_trait::async_trait;
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    /// Users keyed by phone number
    pub const USERS: &str = "users";
    /// Link cache keyed by URL-encoded link
    pub const GLOBAL_LINKS: &str = "global_links";
}

/// Merge function applied to the current cache record (if any) for a URL.
///
/// A transactional store may call it more than once when a commit conflicts,
/// so it must not depend on having run before.
pub type CachedLinkMerge = Arc<dyn Fn(Option<CachedLink>) -> CachedLink + Send + Sync>;

/// Keyed document storage for users and cached links.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get a user by phone number.
    async fn get_user(&self, phone_no: &str) -> Result<Option<User>, AppError>;

    /// Create the user with empty history unless it already exists.
    ///
    /// Returns `true` when a new record was written. An existing record is
    /// left untouched.
    async fn ensure_user(&self, phone_no: &str, name: &str, now: &str)
        -> Result<bool, AppError>;

    /// Append a link and its locations to a user, creating the user first if
    /// needed.
    async fn append_to_user(
        &self,
        phone_no: &str,
        name: &str,
        link: UserLink,
        locations: Vec<Location>,
        now: &str,
    ) -> Result<(), AppError>;

    /// Get the cache record for a URL.
    async fn get_cached_link(&self, url: &str) -> Result<Option<CachedLink>, AppError>;

    /// Insert or merge the cache record for a URL and return what was stored.
    async fn upsert_cached_link(
        &self,
        url: &str,
        merge: CachedLinkMerge,
    ) -> Result<CachedLink, AppError>;

    /// Cheap connectivity check used by the health probe.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Firestore document ids may not contain `/`, so URLs are percent-encoded.
pub fn link_document_id(url: &str) -> String {
    urlencoding::encode(url).into_owned()
}
