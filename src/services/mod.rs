// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod cache;
pub mod enrichment;
pub mod firebase_auth;
pub mod gemini;
pub mod nutrition;
pub mod settings;
pub mod usda;

pub use cache::FoodCache;
pub use enrichment::{FoodEnricher, FoodService};
pub use firebase_auth::{AuthError, FirebaseAuthVerifier, VerifiedUser};
pub use gemini::GeminiClient;
pub use settings::SettingsService;
pub use usda::UsdaClient;
