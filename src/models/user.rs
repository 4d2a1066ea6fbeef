//! User model for storage and API.

use serde::{Deserialize, Serialize};

use super::Location;

/// User record stored in the `users` collection.
///
/// The phone number is the document id and never changes once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Display name as given at login or by the bot sender name
    pub name: String,
    /// WhatsApp id / phone number (also used as document ID)
    #[serde(rename = "phoneNo")]
    pub phone_no: String,
    /// Submitted links, oldest first
    #[serde(default)]
    pub links: Vec<UserLink>,
    /// Locations discovered from this user's links, oldest first
    #[serde(default)]
    pub locations: Vec<Location>,
    /// When the user was first seen (RFC3339)
    pub created_at: String,
    /// Last mutation (RFC3339)
    pub updated_at: String,
}

impl User {
    /// A fresh user with no links or locations.
    pub fn new(name: &str, phone_no: &str, now: &str) -> Self {
        Self {
            name: name.to_string(),
            phone_no: phone_no.to_string(),
            links: Vec::new(),
            locations: Vec::new(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Append one link and its locations. Links are not deduplicated.
    pub fn append(&mut self, link: UserLink, locations: Vec<Location>, now: &str) {
        self.links.push(link);
        self.locations.extend(locations);
        self.updated_at = now.to_string();
    }
}

/// One entry in a user's link history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLink {
    pub url: String,
    pub added_at: String,
}
