// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food enrichment and the cache-backed food pipeline.
//!
//! `FoodService::get_or_enrich` runs, in order and without retries:
//! 1. Cache lookup (hit returns immediately)
//! 2. USDA detail fetch
//! 3. AI enrichment
//! 4. Cache write (failure is logged, the result is still returned)

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{EnrichedFood, Enrichment, FoodEmbedding, FoodRecord, SimilarFood};
use crate::services::{FoodCache, GeminiClient, UsdaClient};
use validator::Validate;

/// Nutrients quoted in the enrichment prompt. The full list can run to
/// 100+ entries for Foundation foods.
const PROMPT_NUTRIENT_LIMIT: usize = 25;

/// Turns a raw food record into an [`EnrichedFood`] via the AI model.
#[derive(Clone)]
pub struct FoodEnricher {
    gemini: GeminiClient,
}

impl FoodEnricher {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    pub async fn enrich(&self, food: &FoodRecord, model: &str) -> Result<EnrichedFood, AppError> {
        let prompt = build_prompt(food);
        let raw = self.gemini.generate_json(model, &prompt).await?;
        let enrichment = parse_enrichment(&raw)?;

        tracing::info!(
            fdc_id = food.fdc_id,
            model,
            category = %enrichment.category,
            health_score = enrichment.health_score,
            "Food enriched"
        );

        Ok(EnrichedFood {
            food: food.clone(),
            enrichment,
            model: model.to_string(),
            enriched_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

fn build_prompt(food: &FoodRecord) -> String {
    let mut prompt = String::from(
        "You are a nutrition coach. Given the USDA food record below, respond with a single \
         JSON object with these fields:\n\
         - summary: string, 1-3 sentences for a coaching client\n\
         - category: string, one broad food group (e.g. protein, grain, dairy, produce, snack)\n\
         - dietary_tags: array of short strings (e.g. high-protein, vegan, gluten-free)\n\
         - allergens: array of common allergens present (may be empty)\n\
         - health_score: integer from 1 (avoid) to 10 (excellent)\n\
         - serving_suggestion: string or null\n\n",
    );

    prompt.push_str(&format!("Description: {}\n", food.description));
    if let Some(brand) = &food.brand_owner {
        prompt.push_str(&format!("Brand: {}\n", brand));
    }
    if let Some(data_type) = &food.data_type {
        prompt.push_str(&format!("Data type: {}\n", data_type));
    }
    if let Some(ingredients) = &food.ingredients {
        prompt.push_str(&format!("Ingredients: {}\n", ingredients));
    }
    if let (Some(size), Some(unit)) = (food.serving_size, &food.serving_size_unit) {
        prompt.push_str(&format!("Serving size: {} {}\n", size, unit));
    }

    if !food.nutrients.is_empty() {
        prompt.push_str("Nutrients per 100 g:\n");
        for n in food.nutrients.iter().take(PROMPT_NUTRIENT_LIMIT) {
            prompt.push_str(&format!("- {}: {} {}\n", n.name, n.amount, n.unit));
        }
    }

    prompt
}

/// Decode and validate the model's JSON output.
fn parse_enrichment(raw: &str) -> Result<Enrichment, AppError> {
    let json = strip_code_fence(raw);

    let enrichment: Enrichment = serde_json::from_str(json).map_err(|e| {
        tracing::warn!(error = %e, raw = %raw, "Unparseable enrichment output");
        AppError::Enrichment("AI response did not match the expected format".to_string())
    })?;

    enrichment.validate().map_err(|e| {
        tracing::warn!(error = %e, "Enrichment output failed validation");
        AppError::Enrichment(format!("AI response failed validation: {}", e))
    })?;

    Ok(enrichment)
}

/// Models sometimes wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

// ─────────────────────────────────────────────────────────────────────────────
// FoodService - cache-backed pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// High-level food operations shared by the route handlers.
#[derive(Clone)]
pub struct FoodService {
    usda: UsdaClient,
    gemini: GeminiClient,
    enricher: FoodEnricher,
    cache: FoodCache,
    db: FirestoreDb,
    embedding_model: String,
}

impl FoodService {
    pub fn new(
        usda: UsdaClient,
        gemini: GeminiClient,
        db: FirestoreDb,
        embedding_model: impl Into<String>,
    ) -> Self {
        Self {
            usda,
            enricher: FoodEnricher::new(gemini.clone()),
            gemini,
            cache: FoodCache::new(db.clone()),
            db,
            embedding_model: embedding_model.into(),
        }
    }

    pub fn usda(&self) -> &UsdaClient {
        &self.usda
    }

    pub fn cache(&self) -> &FoodCache {
        &self.cache
    }

    /// Return the enriched food for `fdc_id`, enriching and caching on a miss.
    pub async fn get_or_enrich(&self, fdc_id: u64, model: &str) -> Result<EnrichedFood, AppError> {
        let key = fdc_id.to_string();

        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let food = self.usda.get_food_details(fdc_id).await?;
        let enriched = self.enricher.enrich(&food, model).await?;
        self.cache.set(&enriched).await;

        Ok(enriched)
    }

    /// Raw food record, preferring the cached copy over a USDA call.
    pub async fn food_record(&self, fdc_id: u64) -> Result<FoodRecord, AppError> {
        match self.cache.get(&fdc_id.to_string()).await {
            Some(cached) => Ok(cached.food),
            None => self.usda.get_food_details(fdc_id).await,
        }
    }

    /// Compute and store the embedding for an already-cached food.
    pub async fn index_embedding(&self, fdc_id: u64) -> Result<SimilarFood, AppError> {
        let cached = self
            .cache
            .get(&fdc_id.to_string())
            .await
            .ok_or_else(|| AppError::NotFound(format!("Food {} has not been enriched", fdc_id)))?;

        let text = embedding_text(&cached);
        let values = self.gemini.embed_text(&self.embedding_model, &text).await?;

        let record = FoodEmbedding {
            fdc_id,
            description: cached.food.description.clone(),
            embedding: firestore::FirestoreVector::new(values),
        };
        self.db.set_food_embedding(&record).await?;

        tracing::info!(fdc_id, "Food embedding stored");
        Ok(record.into())
    }

    /// Nearest stored foods to a free-text query. Failures yield no results.
    pub async fn similar_foods(&self, query: &str, limit: u32) -> Vec<SimilarFood> {
        let embedding = match self.gemini.embed_text(&self.embedding_model, query).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Query embedding failed, returning no results");
                return Vec::new();
            }
        };

        match self.db.find_similar_foods(embedding, limit).await {
            Ok(found) => found.into_iter().map(SimilarFood::from).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Vector search failed, returning no results");
                Vec::new()
            }
        }
    }
}

fn embedding_text(food: &EnrichedFood) -> String {
    let mut text = format!("{}. {}", food.food.description, food.enrichment.summary);
    if !food.enrichment.dietary_tags.is_empty() {
        text.push_str(&format!(" Tags: {}.", food.enrichment.dietary_tags.join(", ")));
    }
    text
}
