// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Food records from USDA FoodData Central and their enriched form.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// One nutrient amount. USDA reports amounts per 100 g of food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodNutrient {
    /// USDA nutrient number (e.g. 1008 = Energy)
    pub nutrient_id: u32,
    pub name: String,
    /// Unit (g, mg, kcal, ...)
    pub unit: String,
    pub amount: f64,
}

/// Food record as normalized from USDA. USDA owns the schema; we only
/// keep the fields below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodRecord {
    /// FoodData Central ID
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub fdc_id: u64,
    pub description: String,
    /// "Branded", "Foundation", "SR Legacy", ...
    pub data_type: Option<String>,
    pub brand_owner: Option<String>,
    pub ingredients: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_size_unit: Option<String>,
    #[serde(default)]
    pub nutrients: Vec<FoodNutrient>,
}

impl FoodRecord {
    /// Look up a nutrient amount by USDA nutrient number.
    pub fn nutrient_amount(&self, nutrient_id: u32) -> Option<f64> {
        self.nutrients
            .iter()
            .find(|n| n.nutrient_id == nutrient_id)
            .map(|n| n.amount)
    }
}

/// AI-derived fields added on top of a food record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Enrichment {
    /// Short coaching-oriented description of the food
    #[validate(length(min = 1, max = 600))]
    pub summary: String,
    /// Broad food group, e.g. "protein", "grain", "snack"
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub allergens: Vec<String>,
    /// 1 (avoid) to 10 (excellent)
    #[validate(range(min = 1, max = 10))]
    pub health_score: u8,
    #[serde(default)]
    #[validate(length(max = 300))]
    pub serving_suggestion: Option<String>,
}

/// Food record plus enrichment. Stored in the global food cache, keyed by
/// the FDC ID as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EnrichedFood {
    pub food: FoodRecord,
    pub enrichment: Enrichment,
    /// Model that produced the enrichment
    pub model: String,
    /// When the enrichment was produced (RFC 3339)
    pub enriched_at: String,
}

impl EnrichedFood {
    /// Cache key (document ID) for this food.
    pub fn cache_key(&self) -> String {
        self.food.fdc_id.to_string()
    }
}

/// Food embedding stored for nearest-neighbour search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEmbedding {
    pub fdc_id: u64,
    pub description: String,
    pub embedding: firestore::FirestoreVector,
}

/// Result of a similar-foods search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SimilarFood {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub fdc_id: u64,
    pub description: String,
}

impl From<FoodEmbedding> for SimilarFood {
    fn from(e: FoodEmbedding) -> Self {
        Self {
            fdc_id: e.fdc_id,
            description: e.description,
        }
    }
}
