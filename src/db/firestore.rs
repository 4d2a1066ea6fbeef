// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile, link history, discovered locations)
//! - Global links (per-URL extraction cache)

use super::{collections, link_document_id, CachedLinkMerge, DocumentStore};
use crate::error::AppError;
use crate::models::{CachedLink, Location, User, UserLink};
use async_trait::async_trait;
use firestore::errors::{BackoffError, FirestoreError};

/// Document id probed by the health check. It never exists.
const PING_DOCUMENT_ID: &str = "__health_probe__";

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Storage(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client for testing.
    ///
    /// All database operations will return a storage error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Storage("Database not connected (offline mode)".to_string()))
    }
}

#[async_trait]
impl DocumentStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, phone_no: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(phone_no)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    async fn ensure_user(
        &self,
        phone_no: &str,
        name: &str,
        now: &str,
    ) -> Result<bool, AppError> {
        let user = User::new(name, phone_no, now);

        // Insert fails with a conflict when the document exists, which keeps
        // the check-and-create atomic across instances.
        let result: Result<(), FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(phone_no)
            .object(&user)
            .execute()
            .await;

        match result {
            Ok(()) => {
                tracing::info!(phone_no, "Created user");
                Ok(true)
            }
            Err(FirestoreError::DataConflictError(_)) => {
                tracing::debug!(phone_no, "User already exists");
                Ok(false)
            }
            Err(e) => Err(AppError::Storage(e.to_string())),
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
        let count = locations.len();
        let (phone_no, name, now) = (phone_no.to_string(), name.to_string(), now.to_string());

        // Read and write share one transaction; Firestore retries the whole
        // closure when another writer touched the user in between.
        self.get_client()?
            .run_transaction(|db, transaction| {
                let (phone_no, name, now) = (phone_no.clone(), name.clone(), now.clone());
                let (link, locations) = (link.clone(), locations.clone());

                Box::pin(async move {
                    let current: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&phone_no)
                        .await?;

                    let mut user = current.unwrap_or_else(|| {
                        tracing::info!(phone_no = %phone_no, "Creating user from message");
                        User::new(&name, &phone_no, &now)
                    });
                    user.append(link, locations, &now);

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&phone_no)
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    Ok::<(), BackoffError<FirestoreError>>(())
                })
            })
            .await
            .map_err(|e| AppError::Storage(format!("User append transaction failed: {}", e)))?;

        tracing::debug!(phone_no = %phone_no, locations = count, "Appended link to user");
        Ok(())
    }

    // ─── Link Cache Operations ───────────────────────────────────

    async fn get_cached_link(&self, url: &str) -> Result<Option<CachedLink>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::GLOBAL_LINKS)
            .obj()
            .one(&link_document_id(url))
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    async fn upsert_cached_link(
        &self,
        url: &str,
        merge: CachedLinkMerge,
    ) -> Result<CachedLink, AppError> {
        let document_id = link_document_id(url);

        let merged = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let document_id = document_id.clone();
                let merge = merge.clone();

                Box::pin(async move {
                    let current: Option<CachedLink> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::GLOBAL_LINKS)
                        .obj()
                        .one(&document_id)
                        .await?;

                    let merged = (*merge)(current);

                    db.fluent()
                        .update()
                        .in_col(collections::GLOBAL_LINKS)
                        .document_id(&document_id)
                        .object(&merged)
                        .add_to_transaction(transaction)?;

                    Ok::<CachedLink, BackoffError<FirestoreError>>(merged)
                })
            })
            .await
            .map_err(|e| AppError::Storage(format!("Link cache transaction failed: {}", e)))?;

        tracing::debug!(
            url,
            processed_count = merged.processed_count,
            "Link cache updated"
        );
        Ok(merged)
    }

    async fn ping(&self) -> Result<(), AppError> {
        let _: Option<User> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(PING_DOCUMENT_ID)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        Ok(())
    }
}
