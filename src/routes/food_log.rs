// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user food log routes (authentication required).

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FoodLogEntry, MacroTotals, Meal};
use crate::services::nutrition;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/food-log", get(list_entries).post(log_food))
        .route("/api/food-log/{entry_id}", delete(delete_entry))
}

/// Parse an optional `YYYY-MM-DD` date, defaulting to today (UTC).
fn resolve_date(date: Option<&str>) -> Result<String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(Utc::now().date_naive().format(DATE_FORMAT).to_string()),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(|d| d.format(DATE_FORMAT).to_string())
            .map_err(|_| {
                AppError::BadRequest(format!("Invalid date '{}': expected YYYY-MM-DD", raw))
            }),
    }
}

// ─── Log ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
struct LogFoodRequest {
    #[serde(alias = "fdcId")]
    #[validate(range(min = 1))]
    fdc_id: u64,
    meal: Meal,
    #[validate(range(exclusive_min = 0.0, max = 5000.0))]
    grams: f64,
    date: Option<String>,
}

/// Record a food for the current user, scaling nutrients to the amount eaten.
async fn log_food(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<LogFoodRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FoodLogEntry>)> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let date = resolve_date(req.date.as_deref())?;

    let food = state.food_service.food_record(req.fdc_id).await?;

    let entry = FoodLogEntry {
        id: uuid::Uuid::new_v4().to_string(),
        uid: user.uid,
        fdc_id: food.fdc_id,
        description: food.description,
        meal: req.meal,
        grams: req.grams,
        date,
        logged_at: Utc::now().to_rfc3339(),
        nutrients: nutrition::scale_nutrients(&food.nutrients, req.grams),
    };

    state.db.add_food_log_entry(&entry).await?;

    tracing::info!(
        uid = %entry.uid,
        entry_id = %entry.id,
        fdc_id = entry.fdc_id,
        "Food logged"
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

// ─── List ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListQuery {
    date: Option<String>,
}

/// One day of the food log.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodLogDay {
    pub date: String,
    pub entries: Vec<FoodLogEntry>,
    pub totals: MacroTotals,
}

async fn list_entries(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    params: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<FoodLogDay>> {
    let Query(params) = params?;
    let date = resolve_date(params.date.as_deref())?;

    let entries = state.db.list_food_log_entries(&user.uid, &date).await?;
    let totals = nutrition::macro_totals(&entries);

    Ok(Json(FoodLogDay {
        date,
        entries,
        totals,
    }))
}

// ─── Delete ──────────────────────────────────────────────────

/// Delete one of the current user's entries. Entries owned by someone
/// else are reported as missing.
async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<StatusCode> {
    match state.db.get_food_log_entry(&entry_id).await? {
        Some(entry) if entry.uid == user.uid => {}
        _ => return Err(AppError::NotFound(format!("food log entry {}", entry_id))),
    }

    state.db.delete_food_log_entry(&entry_id).await?;
    tracing::info!(uid = %user.uid, entry_id = %entry_id, "Food log entry deleted");

    Ok(StatusCode::NO_CONTENT)
}
