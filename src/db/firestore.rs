// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Global food cache (enriched foods)
//! - Site settings singleton
//! - Admin allow-list
//! - Food log entries
//! - Food embeddings (vector search)

use crate::db::{collections, SITE_SETTINGS_DOC_ID};
use crate::error::AppError;
use crate::models::{AdminGrant, EnrichedFood, FoodEmbedding, FoodLogEntry, SiteSettings};
use firestore::{FirestoreFindNearestDistanceMeasure, FirestoreQueryDirection, FirestoreVector};

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
        // The emulator does not need credentials; skip the ADC lookup.
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

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Global Food Cache ───────────────────────────────────────

    /// Get a cached enriched food by its cache key (FDC ID string).
    pub async fn get_cached_food(&self, key: &str) -> Result<Option<EnrichedFood>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::GLOBAL_FOODS)
            .obj()
            .one(key)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store an enriched food under its cache key. Last write wins.
    pub async fn set_cached_food(&self, food: &EnrichedFood) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::GLOBAL_FOODS)
            .document_id(food.cache_key())
            .object(food)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Site Settings ───────────────────────────────────────────

    /// Get the site settings singleton, if it has ever been written.
    pub async fn get_site_settings(&self) -> Result<Option<SiteSettings>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SITE_SETTINGS)
            .obj()
            .one(SITE_SETTINGS_DOC_ID)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite the site settings singleton.
    pub async fn set_site_settings(&self, settings: &SiteSettings) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SITE_SETTINGS)
            .document_id(SITE_SETTINGS_DOC_ID)
            .object(settings)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Admin Allow-list ────────────────────────────────────────

    /// Get the admin grant for a uid, if any.
    pub async fn get_admin_grant(&self, uid: &str) -> Result<Option<AdminGrant>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ADMINS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Grant admin access to a uid.
    pub async fn set_admin_grant(&self, uid: &str, grant: &AdminGrant) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ADMINS)
            .document_id(uid)
            .object(grant)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Food Log ────────────────────────────────────────────────

    /// Store a new food log entry.
    pub async fn add_food_log_entry(&self, entry: &FoodLogEntry) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FOOD_LOGS)
            .document_id(&entry.id)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a food log entry by ID.
    pub async fn get_food_log_entry(&self, id: &str) -> Result<Option<FoodLogEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FOOD_LOGS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's entries for one day, oldest first.
    pub async fn list_food_log_entries(
        &self,
        uid: &str,
        date: &str,
    ) -> Result<Vec<FoodLogEntry>, AppError> {
        let uid = uid.to_string();
        let date = date.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::FOOD_LOGS)
            .filter(move |q| {
                q.for_all([
                    q.field("uid").eq(uid.clone()),
                    q.field("date").eq(date.clone()),
                ])
            })
            .order_by([("logged_at", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a food log entry.
    pub async fn delete_food_log_entry(&self, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::FOOD_LOGS)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Food Embeddings ─────────────────────────────────────────

    /// Store the embedding for a food, keyed by FDC ID.
    pub async fn set_food_embedding(&self, record: &FoodEmbedding) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FOOD_EMBEDDINGS)
            .document_id(record.fdc_id.to_string())
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Nearest-neighbour query over stored food embeddings (cosine distance).
    pub async fn find_similar_foods(
        &self,
        embedding: Vec<f64>,
        limit: u32,
    ) -> Result<Vec<FoodEmbedding>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::FOOD_EMBEDDINGS)
            .find_nearest(
                "embedding",
                FirestoreVector::new(embedding),
                FirestoreFindNearestDistanceMeasure::Cosine,
                limit,
            )
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
