// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Site settings access.

use crate::config::Config;
use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{SiteSettings, SiteSettingsUpdate};
use validator::Validate;

#[derive(Clone)]
pub struct SettingsService {
    db: FirestoreDb,
}

impl SettingsService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Current settings. A missing document or a failed read yields defaults.
    pub async fn get(&self) -> SiteSettings {
        match self.db.get_site_settings().await {
            Ok(Some(settings)) => settings,
            Ok(None) => SiteSettings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read site settings, using defaults");
                SiteSettings::default()
            }
        }
    }

    /// Merge `update` into the stored settings.
    pub async fn update(&self, update: SiteSettingsUpdate) -> Result<SiteSettings, AppError> {
        update
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        // Read failures must not silently wipe fields on write.
        let mut settings = self.db.get_site_settings().await?.unwrap_or_default();
        settings.apply(update);
        settings.updated_at = chrono::Utc::now().to_rfc3339();

        self.db.set_site_settings(&settings).await?;
        tracing::info!(ai_model = %settings.ai_model, "Site settings updated");
        Ok(settings)
    }

    /// Model to use for enrichment.
    pub async fn ai_model(&self, config: &Config) -> String {
        resolve_ai_model(&self.get().await, config)
    }
}

fn resolve_ai_model(settings: &SiteSettings, config: &Config) -> String {
    let model = settings.ai_model.trim();
    if model.is_empty() {
        config.default_ai_model.clone()
    } else {
        model.to_string()
    }
}
