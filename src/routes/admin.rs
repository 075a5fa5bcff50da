// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin routes. Authentication and the admin check are applied in
//! routes/mod.rs.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{SimilarFood, SiteSettings, SiteSettingsUpdate};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{post, put},
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/settings", put(update_settings))
        .route(
            "/api/admin/foods/{fdc_id}/embedding",
            post(index_food_embedding),
        )
}

/// Merge-update the site settings.
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<SiteSettingsUpdate>, JsonRejection>,
) -> Result<Json<SiteSettings>> {
    let Json(update) = payload?;

    tracing::info!(uid = %user.uid, "Admin updating site settings");
    let settings = state.settings_service.update(update).await?;
    Ok(Json(settings))
}

/// Compute and store the embedding of an enriched food.
async fn index_food_embedding(
    State(state): State<Arc<AppState>>,
    Path(fdc_id): Path<String>,
) -> Result<Json<SimilarFood>> {
    let fdc_id = fdc_id
        .trim()
        .parse::<u64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid food id '{}'", fdc_id)))?;

    let indexed = state.food_service.index_embedding(fdc_id).await?;
    Ok(Json(indexed))
}
