// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Site settings singleton and admin grants.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Site-wide configuration document.
///
/// Every field defaults to empty so a missing document still yields a
/// fully-populated value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(default)]
pub struct SiteSettings {
    /// AI model used for enrichment ("" = server default)
    pub ai_model: String,
    /// Coach scheduling link shown to clients
    pub scheduling_link: String,
    /// Free-form availability text
    pub availability: String,
    /// Last update (RFC 3339), empty if never written
    pub updated_at: String,
}

impl SiteSettings {
    /// Merge the provided fields of `update` into these settings.
    pub fn apply(&mut self, update: SiteSettingsUpdate) {
        if let Some(ai_model) = update.ai_model {
            self.ai_model = ai_model;
        }
        if let Some(scheduling_link) = update.scheduling_link {
            self.scheduling_link = scheduling_link;
        }
        if let Some(availability) = update.availability {
            self.availability = availability;
        }
    }
}

/// Partial update from the admin UI. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SiteSettingsUpdate {
    #[validate(length(min = 1, max = 64))]
    pub ai_model: Option<String>,
    #[validate(url)]
    pub scheduling_link: Option<String>,
    #[validate(length(max = 500))]
    pub availability: Option<String>,
}

/// Entry in the admin allow-list, keyed by Firebase uid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminGrant {
    /// uid (or email) of whoever granted access
    pub granted_by: String,
    pub granted_at: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_defined_but_empty() {
        let s = SiteSettings::default();
        assert_eq!(s.ai_model, "");
        assert_eq!(s.scheduling_link, "");
        assert_eq!(s.availability, "");
        assert_eq!(s.updated_at, "");
    }

    #[test]
    fn partial_document_fills_missing_fields() {
        let s: SiteSettings = serde_json::from_str(r#"{"ai_model":"gemini-2.0-flash"}"#).unwrap();
        assert_eq!(s.ai_model, "gemini-2.0-flash");
        assert_eq!(s.scheduling_link, "");
    }

    #[test]
    fn apply_merges_only_provided_fields() {
        let mut s = SiteSettings {
            ai_model: "a".to_string(),
            scheduling_link: "https://cal.example.com/coach".to_string(),
            availability: "Weekdays".to_string(),
            updated_at: String::new(),
        };
        s.apply(SiteSettingsUpdate {
            ai_model: Some("b".to_string()),
            ..Default::default()
        });
        assert_eq!(s.ai_model, "b");
        assert_eq!(s.scheduling_link, "https://cal.example.com/coach");
        assert_eq!(s.availability, "Weekdays");
    }

    #[test]
    fn update_validation_rejects_bad_link() {
        let update = SiteSettingsUpdate {
            scheduling_link: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
