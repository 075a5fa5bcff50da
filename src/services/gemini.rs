// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gemini API client for JSON generation and text embeddings.
//!
//! Every failure (missing key, transport, non-success status, empty
//! candidate list) is reported as `AppError::Enrichment` with a message a
//! user can read.

use crate::config::Config;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.gemini_base_url.clone(), config.gemini_api_key.clone())
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a JSON document from a prompt and return its raw text.
    pub async fn generate_json(&self, model: &str, prompt: &str) -> Result<String, AppError> {
        let url = self.build_url(model, "generateContent")?;

        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: 0.2,
            },
        };

        // The URL carries the API key; keep it out of error messages.
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::Enrichment(format!("AI service is unreachable: {}", e.without_url()))
            })?;

        let body: GenerateResponse = check_response_json(response).await?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Enrichment("AI service returned no content".to_string()))?;

        tracing::debug!(model, chars = text.len(), "Gemini generation complete");
        Ok(text)
    }

    /// Embed a piece of text.
    pub async fn embed_text(&self, model: &str, text: &str) -> Result<Vec<f64>, AppError> {
        let url = self.build_url(model, "embedContent")?;

        let request = EmbedRequest {
            content: Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::Enrichment(format!("AI service is unreachable: {}", e.without_url()))
            })?;

        let body: EmbedResponse = check_response_json(response).await?;

        if body.embedding.values.is_empty() {
            return Err(AppError::Enrichment(
                "AI service returned an empty embedding".to_string(),
            ));
        }

        Ok(body.embedding.values)
    }

    fn build_url(&self, model: &str, method: &str) -> Result<String, AppError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Enrichment("AI service is not configured on this server".to_string())
        })?;

        Ok(format!(
            "{}/models/{}:{}?key={}",
            self.base_url,
            model,
            method,
            urlencoding::encode(key)
        ))
    }
}

async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, body = %body, "Gemini non-success response");
        return Err(AppError::Enrichment(format!(
            "AI service returned status {}",
            status
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Enrichment(format!("AI service sent an invalid response: {}", e)))
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f64>,
}
