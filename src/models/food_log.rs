// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Food log entries recorded by clients.

use crate::models::FoodNutrient;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Meal slot an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// One logged food, with nutrients already scaled to the logged amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodLogEntry {
    /// Entry ID (also used as document ID)
    pub id: String,
    /// Firebase uid of the owner
    pub uid: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub fdc_id: u64,
    pub description: String,
    pub meal: Meal,
    /// Amount eaten in grams
    pub grams: f64,
    /// Local calendar day (YYYY-MM-DD)
    pub date: String,
    /// When the entry was created (RFC 3339)
    pub logged_at: String,
    pub nutrients: Vec<FoodNutrient>,
}

/// Macro totals for a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
}
