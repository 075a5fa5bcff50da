// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public food routes: search, details, enrichment, similar foods.

use crate::error::{AppError, Result};
use crate::models::{EnrichedFood, FoodRecord, SimilarFood};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const MAX_QUERY_LEN: usize = 200;
const DEFAULT_SIMILAR_LIMIT: u32 = 5;
const MAX_SIMILAR_LIMIT: u32 = 20;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/foods/search", get(search_foods))
        .route("/api/foods/similar", get(similar_foods))
        .route("/api/foods/enrich", post(enrich_food))
        .route("/api/foods/{fdc_id}", get(get_food))
}

// ─── Search ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchQuery {
    query: Option<String>,
}

/// Validate and normalize a free-text query parameter.
fn required_query(query: Option<String>) -> Result<String> {
    let query = query.unwrap_or_default();
    let query = query.trim();

    if query.is_empty() {
        return Err(AppError::BadRequest(
            "Missing required parameter: query".to_string(),
        ));
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(AppError::BadRequest(format!(
            "Query must be at most {} characters",
            MAX_QUERY_LEN
        )));
    }

    Ok(query.to_string())
}

/// Search USDA foods. Upstream failures produce an empty list.
async fn search_foods(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<FoodRecord>>> {
    let Query(params) = params?;
    let query = required_query(params.query)?;

    let foods = state.food_service.usda().search_foods(&query).await;
    Ok(Json(foods))
}

// ─── Details ─────────────────────────────────────────────────

fn parse_fdc_id(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(format!(
            "Invalid food id '{}': must be a positive integer",
            raw
        ))),
    }
}

/// Raw USDA details for one food.
async fn get_food(
    State(state): State<Arc<AppState>>,
    Path(fdc_id): Path<String>,
) -> Result<Json<FoodRecord>> {
    let fdc_id = parse_fdc_id(&fdc_id)?;
    let food = state.food_service.usda().get_food_details(fdc_id).await?;
    Ok(Json(food))
}

// ─── Enrichment ──────────────────────────────────────────────

/// Clients send the id either as a number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum FdcIdInput {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
struct EnrichRequest {
    #[serde(alias = "fdcId")]
    fdc_id: Option<FdcIdInput>,
}

/// Enriched food for an FDC ID, served from cache when possible.
async fn enrich_food(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<EnrichRequest>, JsonRejection>,
) -> Result<Json<EnrichedFood>> {
    let Json(payload) = payload?;

    let fdc_id = match payload.fdc_id {
        None => {
            return Err(AppError::BadRequest(
                "Missing required field: fdc_id".to_string(),
            ))
        }
        Some(FdcIdInput::Number(0)) => {
            return Err(AppError::BadRequest(
                "Invalid food id '0': must be a positive integer".to_string(),
            ))
        }
        Some(FdcIdInput::Number(id)) => id,
        Some(FdcIdInput::Text(raw)) => parse_fdc_id(&raw)?,
    };

    let model = state.settings_service.ai_model(&state.config).await;
    tracing::debug!(fdc_id, model = %model, "Enrichment requested");

    let food = state.food_service.get_or_enrich(fdc_id, &model).await?;
    Ok(Json(food))
}

// ─── Similar Foods ───────────────────────────────────────────

#[derive(Deserialize)]
struct SimilarQuery {
    query: Option<String>,
    limit: Option<u32>,
}

/// Nearest stored foods to a free-text query. Failures produce an empty list.
async fn similar_foods(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<SimilarQuery>, QueryRejection>,
) -> Result<Json<Vec<SimilarFood>>> {
    let Query(params) = params?;
    let query = required_query(params.query)?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SIMILAR_LIMIT)
        .clamp(1, MAX_SIMILAR_LIMIT);

    let foods = state.food_service.similar_foods(&query, limit).await;
    Ok(Json(foods))
}
