// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrient arithmetic for the food log.

use crate::models::{FoodLogEntry, FoodNutrient, MacroTotals};

/// USDA nutrient numbers used for macro totals.
pub mod nutrient_ids {
    pub const PROTEIN: u32 = 1003;
    pub const TOTAL_FAT: u32 = 1004;
    pub const CARBOHYDRATE: u32 = 1005;
    pub const ENERGY_KCAL: u32 = 1008;
    /// Foundation foods report energy only under the Atwater factors.
    pub const ENERGY_ATWATER_GENERAL: u32 = 2047;
    pub const ENERGY_ATWATER_SPECIFIC: u32 = 2048;
}

/// Scale per-100 g nutrient amounts to `grams`. Amounts are stored
/// unrounded so trace nutrients survive small portions; only
/// [`macro_totals`] rounds.
pub fn scale_nutrients(nutrients: &[FoodNutrient], grams: f64) -> Vec<FoodNutrient> {
    let factor = grams / 100.0;
    nutrients
        .iter()
        .map(|n| FoodNutrient {
            amount: n.amount * factor,
            ..n.clone()
        })
        .collect()
}

/// Sum macros across entries.
pub fn macro_totals(entries: &[FoodLogEntry]) -> MacroTotals {
    let mut totals = MacroTotals::default();

    for entry in entries {
        totals.calories += energy_kcal(&entry.nutrients);
        totals.protein_g += amount(&entry.nutrients, nutrient_ids::PROTEIN);
        totals.fat_g += amount(&entry.nutrients, nutrient_ids::TOTAL_FAT);
        totals.carbs_g += amount(&entry.nutrients, nutrient_ids::CARBOHYDRATE);
    }

    MacroTotals {
        calories: round2(totals.calories),
        protein_g: round2(totals.protein_g),
        fat_g: round2(totals.fat_g),
        carbs_g: round2(totals.carbs_g),
    }
}

fn amount(nutrients: &[FoodNutrient], id: u32) -> f64 {
    nutrients
        .iter()
        .find(|n| n.nutrient_id == id)
        .map(|n| n.amount)
        .unwrap_or(0.0)
}

fn energy_kcal(nutrients: &[FoodNutrient]) -> f64 {
    [
        nutrient_ids::ENERGY_KCAL,
        nutrient_ids::ENERGY_ATWATER_GENERAL,
        nutrient_ids::ENERGY_ATWATER_SPECIFIC,
    ]
    .iter()
    .find_map(|id| {
        nutrients
            .iter()
            // 1008 is also reported in kJ for some foods.
            .find(|n| n.nutrient_id == *id && n.unit.eq_ignore_ascii_case("kcal"))
            .map(|n| n.amount)
    })
    .unwrap_or(0.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Meal;

    fn nutrient(id: u32, unit: &str, amount: f64) -> FoodNutrient {
        FoodNutrient {
            nutrient_id: id,
            name: format!("n{id}"),
            unit: unit.to_string(),
            amount,
        }
    }

    fn entry(nutrients: Vec<FoodNutrient>) -> FoodLogEntry {
        FoodLogEntry {
            id: "e".to_string(),
            uid: "u".to_string(),
            fdc_id: 1,
            description: "food".to_string(),
            meal: Meal::Lunch,
            grams: 100.0,
            date: "2026-01-01".to_string(),
            logged_at: "2026-01-01T12:00:00Z".to_string(),
            nutrients,
        }
    }

    #[test]
    fn scaling_is_per_100_grams() {
        let scaled = scale_nutrients(&[nutrient(1003, "g", 20.0)], 150.0);
        assert_eq!(scaled[0].amount, 30.0);
        assert_eq!(scaled[0].nutrient_id, 1003);
    }

    #[test]
    fn trace_nutrients_keep_precision() {
        // Copper at 0.05 mg per 100 g, 10 g logged
        let scaled = scale_nutrients(&[nutrient(1098, "mg", 0.05)], 10.0);
        assert!((scaled[0].amount - 0.005).abs() < 1e-12);

        let scaled = scale_nutrients(&[nutrient(1098, "mg", 0.02)], 5.0);
        assert!(scaled[0].amount > 0.0);
    }

    #[test]
    fn totals_are_rounded_after_summing() {
        let entries = vec![
            entry(vec![nutrient(1003, "g", 0.004)]),
            entry(vec![nutrient(1003, "g", 0.004)]),
        ];
        assert_eq!(macro_totals(&entries).protein_g, 0.01);
    }

    #[test]
    fn totals_sum_macros_across_entries() {
        let entries = vec![
            entry(vec![
                nutrient(1008, "kcal", 200.0),
                nutrient(1003, "g", 10.0),
                nutrient(1004, "g", 5.5),
                nutrient(1005, "g", 20.0),
            ]),
            entry(vec![nutrient(1008, "kcal", 100.25), nutrient(1003, "g", 2.5)]),
        ];

        let totals = macro_totals(&entries);
        assert_eq!(totals.calories, 300.25);
        assert_eq!(totals.protein_g, 12.5);
        assert_eq!(totals.fat_g, 5.5);
        assert_eq!(totals.carbs_g, 20.0);
    }

    #[test]
    fn energy_falls_back_to_atwater_and_skips_kj() {
        let entries = vec![entry(vec![
            nutrient(1008, "kJ", 500.0),
            nutrient(2047, "KCAL", 120.0),
        ])];
        assert_eq!(macro_totals(&entries).calories, 120.0);
    }

    #[test]
    fn no_entries_is_zero() {
        assert_eq!(macro_totals(&[]), MacroTotals::default());
    }
}
