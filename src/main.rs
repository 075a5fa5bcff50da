// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coaching Nutrition API Server
//!
//! All long-lived dependencies are created here, once, and handed to the
//! router through `AppState`.

use coaching_nutrition::{
    config::Config, db::FirestoreDb, services::FirebaseAuthVerifier, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Coaching Nutrition API");

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; enrichment and similar-food search will fail");
    }

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    let auth_verifier = Arc::new(FirebaseAuthVerifier::new(&config)?);

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db, auth_verifier));

    // Build router
    let app = coaching_nutrition::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("coaching_nutrition=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
