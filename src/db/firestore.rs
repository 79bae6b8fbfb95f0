// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts and profiles)
//! - Email claims (create-only documents that make emails unique)
//! - Clothing items (read-only catalog, written by the import tool)
//! - Image URLs (raw import staging)

use crate::db::{collections, email_doc_id, url_doc_id};
use crate::error::AppError;
use crate::models::{ClothingItem, ImageUrl, User};
use firestore::errors::FirestoreError;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Firestore caps `IN` filters at 30 values.
const MAX_IN_VALUES: usize = 30;
const MAX_CONCURRENT_DB_OPS: usize = 8;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Marker document reserving an email address for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmailClaim {
    user_id: String,
}

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
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

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
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
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
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by normalized email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Create a new user, failing with `EmailTaken` if the email is claimed.
    ///
    /// The email claim is a create-only document, so two concurrent signups
    /// for the same address cannot both succeed.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let client = self.get_client()?;
        let claim_id = email_doc_id(&user.email);

        let claimed: Result<EmailClaim, FirestoreError> = client
            .fluent()
            .insert()
            .into(collections::USER_EMAILS)
            .document_id(&claim_id)
            .object(&EmailClaim {
                user_id: user.id.clone(),
            })
            .execute()
            .await;

        match claimed {
            Ok(_) => {}
            Err(FirestoreError::DataConflictError(_)) => return Err(AppError::EmailTaken),
            Err(e) => return Err(AppError::Database(e.to_string())),
        }

        let inserted: Result<User, FirestoreError> = client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await;

        if let Err(e) = inserted {
            // Release the claim so the address is not locked forever.
            if let Err(cleanup) = client
                .fluent()
                .delete()
                .from(collections::USER_EMAILS)
                .document_id(&claim_id)
                .execute()
                .await
            {
                tracing::error!(error = %cleanup, "Failed to release email claim");
            }
            return Err(AppError::Database(e.to_string()));
        }

        Ok(())
    }

    /// Overwrite an existing user document.
    pub async fn save_user(&self, user: &User) -> Result<(), AppError> {
        let _: User = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Catalog Operations ──────────────────────────────────────

    /// Fetch catalog items whose `name_key` is one of `keys`.
    ///
    /// Keys are deduplicated, then split into `IN` queries of at most 30
    /// values, run concurrently. Each matching document is returned once.
    pub async fn find_clothing_items(&self, keys: &[String]) -> Result<Vec<ClothingItem>, AppError> {
        let client = self.get_client()?;

        let unique: Vec<String> = keys
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let chunks: Vec<Vec<String>> = unique.chunks(MAX_IN_VALUES).map(|c| c.to_vec()).collect();

        let results = stream::iter(chunks)
            .map(|chunk| async move {
                client
                    .fluent()
                    .select()
                    .from(collections::CLOTHING_ITEMS)
                    .filter(move |q| q.for_all([q.field("nameKey").is_in(chunk.clone())]))
                    .obj::<ClothingItem>()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Vec<ClothingItem>, AppError>>>()
            .await;

        let mut items = Vec::new();
        for chunk in results {
            items.extend(chunk?);
        }
        Ok(items)
    }

    /// Insert catalog items with generated document IDs, in transaction batches.
    pub async fn insert_clothing_items(&self, items: &[ClothingItem]) -> Result<usize, AppError> {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                client
                    .fluent()
                    .update()
                    .in_col(collections::CLOTHING_ITEMS)
                    .document_id(uuid::Uuid::new_v4().to_string())
                    .object(item)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add item to transaction: {}", e))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit catalog batch: {}", e))
            })?;
        }

        Ok(items.len())
    }

    /// Store an image URL unless it is already present. Returns `true` if inserted.
    pub async fn insert_image_url(&self, url: &str) -> Result<bool, AppError> {
        let inserted: Result<ImageUrl, FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::IMAGE_URLS)
            .document_id(url_doc_id(url))
            .object(&ImageUrl {
                url: url.to_string(),
            })
            .execute()
            .await;

        match inserted {
            Ok(_) => Ok(true),
            Err(FirestoreError::DataConflictError(_)) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Round-trip a cheap read to confirm connectivity.
    pub async fn ping(&self) -> Result<(), AppError> {
        let _: Option<EmailClaim> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_EMAILS)
            .obj()
            .one("__ping__")
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
