// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Coaching nutrition backend: USDA food search, AI food enrichment with a
//! Firestore-backed global cache, site settings and client food logs.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{FirebaseAuthVerifier, FoodService, GeminiClient, SettingsService, UsdaClient};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub food_service: FoodService,
    pub settings_service: SettingsService,
    pub auth_verifier: Arc<FirebaseAuthVerifier>,
}

impl AppState {
    /// Wire services from already-initialized dependencies.
    pub fn new(config: Config, db: FirestoreDb, auth_verifier: Arc<FirebaseAuthVerifier>) -> Self {
        let food_service = FoodService::new(
            UsdaClient::from_config(&config),
            GeminiClient::from_config(&config),
            db.clone(),
            config.embedding_model.clone(),
        );
        let settings_service = SettingsService::new(db.clone());

        Self {
            config,
            db,
            food_service,
            settings_service,
            auth_verifier,
        }
    }
}
