// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public site settings route.

use crate::models::SiteSettings;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/settings", get(get_settings))
}

/// Current site settings; defaults when none have been saved.
async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SiteSettings> {
    Json(state.settings_service.get().await)
}
