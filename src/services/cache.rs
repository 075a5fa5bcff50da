// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Global food cache over the `globalFoods` collection.
//!
//! Failures never reach the caller: a failed read is a miss and a failed
//! write is dropped, both logged. No TTL, no eviction, last write wins.

use crate::db::FirestoreDb;
use crate::models::EnrichedFood;

#[derive(Clone)]
pub struct FoodCache {
    db: FirestoreDb,
}

impl FoodCache {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Read an enriched food by cache key.
    pub async fn get(&self, key: &str) -> Option<EnrichedFood> {
        if key.trim().is_empty() {
            return None;
        }

        match self.db.get_cached_food(key).await {
            Ok(Some(food)) => {
                tracing::debug!(key, "Food cache hit");
                Some(food)
            }
            Ok(None) => {
                tracing::debug!(key, "Food cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, key, "Food cache read failed, treating as miss");
                None
            }
        }
    }

    /// Write an enriched food under its cache key.
    pub async fn set(&self, food: &EnrichedFood) {
        let key = food.cache_key();
        if key.trim().is_empty() {
            tracing::warn!("Refusing to cache food with empty key");
            return;
        }

        match self.db.set_cached_food(food).await {
            Ok(()) => tracing::debug!(key = %key, "Food cached"),
            Err(e) => tracing::warn!(error = %e, key = %key, "Food cache write failed"),
        }
    }
}
