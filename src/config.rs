// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Loaded exactly once in `main` and shared through `AppState`; nothing
//! else in the crate reads the environment.

use std::env;

pub const DEFAULT_USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_AI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID (also the Firebase project that issues ID tokens)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// USDA FoodData Central base URL
    pub usda_base_url: String,
    /// Gemini API base URL
    pub gemini_base_url: String,
    /// Model used for enrichment when site settings do not pick one
    pub default_ai_model: String,
    /// Model used for food embeddings
    pub embedding_model: String,

    // --- Secrets ---
    /// USDA FoodData Central API key
    pub usda_api_key: String,
    /// Gemini API key. AI flows fail with a 500 envelope when absent.
    pub gemini_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => 8080,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port,
            usda_base_url: env::var("USDA_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_USDA_BASE_URL.to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            default_ai_model: env::var("DEFAULT_AI_MODEL")
                .unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),

            usda_api_key: env::var("USDA_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("USDA_API_KEY"))?,
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// Config for tests only. Upstream URLs point nowhere useful; tests
    /// that exercise outbound calls override them.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            usda_base_url: "http://127.0.0.1:9/fdc/v1".to_string(),
            gemini_base_url: "http://127.0.0.1:9/v1beta".to_string(),
            default_ai_model: DEFAULT_AI_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            usda_api_key: "test_usda_key".to_string(),
            gemini_api_key: Some("test_gemini_key".to_string()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
