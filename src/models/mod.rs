// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod food;
pub mod food_log;
pub mod settings;

pub use food::{EnrichedFood, Enrichment, FoodEmbedding, FoodNutrient, FoodRecord, SimilarFood};
pub use food_log::{FoodLogEntry, MacroTotals, Meal};
pub use settings::{AdminGrant, SiteSettings, SiteSettingsUpdate};
