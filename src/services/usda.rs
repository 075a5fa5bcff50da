// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! USDA FoodData Central API client.
//!
//! Handles:
//! - Food search (fixed page size, empty result on any failure)
//! - Food detail fetch (error on any failure)
//!
//! Upstream JSON is decoded into private typed structs and normalized to
//! [`FoodRecord`]. There is no retry, backoff or rate-limit handling.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{FoodNutrient, FoodRecord};
use serde::Deserialize;

/// Number of results requested from the search endpoint.
pub const SEARCH_PAGE_SIZE: u32 = 25;

/// USDA FoodData Central client.
#[derive(Clone)]
pub struct UsdaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl UsdaClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.usda_base_url.clone(), config.usda_api_key.clone())
    }

    /// Search foods by free text.
    ///
    /// Never fails: transport errors, non-success statuses and malformed
    /// bodies are logged and produce an empty list.
    pub async fn search_foods(&self, query: &str) -> Vec<FoodRecord> {
        match self.try_search_foods(query).await {
            Ok(foods) => foods,
            Err(e) => {
                tracing::warn!(error = %e, query, "USDA search failed, returning no results");
                Vec::new()
            }
        }
    }

    async fn try_search_foods(&self, query: &str) -> Result<Vec<FoodRecord>, AppError> {
        let url = format!("{}/foods/search", self.base_url);
        let page_size = SEARCH_PAGE_SIZE.to_string();

        // The URL carries the API key; keep it out of error messages.
        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::UsdaApi(format!("Search request failed: {}", e.without_url()))
            })?;

        let body: SearchResponse = check_response_json(response).await?;

        let foods: Vec<FoodRecord> = body.foods.into_iter().map(FoodRecord::from).collect();
        tracing::debug!(query, count = foods.len(), "USDA search complete");
        Ok(foods)
    }

    /// Get full details for one food.
    pub async fn get_food_details(&self, fdc_id: u64) -> Result<FoodRecord, AppError> {
        let url = format!("{}/food/{}", self.base_url, fdc_id);

        // The URL carries the API key; keep it out of error messages.
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                AppError::UsdaApi(format!("Detail request failed: {}", e.without_url()))
            })?;

        let body: DetailResponse = check_response_json(response).await?;
        Ok(FoodRecord::from(body))
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = %status, body = %body, "USDA non-success response");
        return Err(AppError::UsdaApi(format!(
            "USDA request failed with status {}",
            status
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::UsdaApi(format!("Invalid USDA response: {}", e.without_url())))
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

/// Search result item. Nutrients are flat on this endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    fdc_id: u64,
    description: String,
    data_type: Option<String>,
    brand_owner: Option<String>,
    ingredients: Option<String>,
    serving_size: Option<f64>,
    serving_size_unit: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<SearchNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNutrient {
    nutrient_id: Option<u32>,
    nutrient_name: Option<String>,
    unit_name: Option<String>,
    value: Option<f64>,
}

/// Detail response. Nutrients are nested on this endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailResponse {
    fdc_id: u64,
    description: String,
    data_type: Option<String>,
    brand_owner: Option<String>,
    ingredients: Option<String>,
    serving_size: Option<f64>,
    serving_size_unit: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<DetailNutrient>,
}

#[derive(Debug, Deserialize)]
struct DetailNutrient {
    nutrient: Option<NutrientInfo>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NutrientInfo {
    /// Legacy nutrient number ("203"), only used when `id` is absent
    number: Option<String>,
    id: Option<u32>,
    name: Option<String>,
    unit_name: Option<String>,
}

impl From<SearchFood> for FoodRecord {
    fn from(f: SearchFood) -> Self {
        let nutrients = f
            .food_nutrients
            .into_iter()
            .filter_map(|n| {
                Some(FoodNutrient {
                    nutrient_id: n.nutrient_id?,
                    name: n.nutrient_name?,
                    unit: n.unit_name.unwrap_or_default(),
                    amount: n.value.unwrap_or(0.0),
                })
            })
            .collect();

        Self {
            fdc_id: f.fdc_id,
            description: f.description,
            data_type: f.data_type,
            brand_owner: f.brand_owner,
            ingredients: f.ingredients,
            serving_size: f.serving_size,
            serving_size_unit: f.serving_size_unit,
            nutrients,
        }
    }
}

impl From<DetailResponse> for FoodRecord {
    fn from(d: DetailResponse) -> Self {
        let nutrients = d
            .food_nutrients
            .into_iter()
            .filter_map(|n| {
                let info = n.nutrient?;
                // `id` matches `nutrientId` in search results.
                let nutrient_id = info
                    .id
                    .or_else(|| info.number.as_deref().and_then(|s| s.parse().ok()))?;
                Some(FoodNutrient {
                    nutrient_id,
                    name: info.name?,
                    unit: info.unit_name.unwrap_or_default(),
                    amount: n.amount.unwrap_or(0.0),
                })
            })
            .collect();

        Self {
            fdc_id: d.fdc_id,
            description: d.description,
            data_type: d.data_type,
            brand_owner: d.brand_owner,
            ingredients: d.ingredients,
            serving_size: d.serving_size,
            serving_size_unit: d.serving_size_unit,
            nutrients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_payload_normalizes_flat_nutrients() {
        let raw = r#"{
            "totalHits": 1,
            "foods": [{
                "fdcId": 2345678,
                "description": "GREEK YOGURT",
                "dataType": "Branded",
                "brandOwner": "Acme Dairy",
                "ingredients": "CULTURED MILK",
                "foodNutrients": [
                    {"nutrientId": 1003, "nutrientName": "Protein", "unitName": "G", "value": 10.0},
                    {"nutrientName": "Broken", "value": 1.0}
                ]
            }]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        let foods: Vec<FoodRecord> = parsed.foods.into_iter().map(FoodRecord::from).collect();

        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].fdc_id, 2345678);
        assert_eq!(foods[0].brand_owner.as_deref(), Some("Acme Dairy"));
        assert_eq!(foods[0].nutrients.len(), 1);
        assert_eq!(foods[0].nutrient_amount(1003), Some(10.0));
    }

    #[test]
    fn detail_payload_normalizes_nested_nutrients() {
        let raw = r#"{
            "fdcId": 171077,
            "description": "Chicken, broiler, breast, raw",
            "dataType": "SR Legacy",
            "foodNutrients": [
                {"nutrient": {"id": 1003, "number": "203", "name": "Protein", "unitName": "g"}, "amount": 22.5},
                {"nutrient": {"id": 2047, "name": "Energy (Atwater General Factors)", "unitName": "kcal"}, "amount": 120.0},
                {"amount": 5.0}
            ]
        }"#;

        let parsed: DetailResponse = serde_json::from_str(raw).unwrap();
        let food = FoodRecord::from(parsed);

        assert_eq!(food.fdc_id, 171077);
        assert_eq!(food.nutrients.len(), 2);
        assert_eq!(food.nutrient_amount(1003), Some(22.5));
        assert_eq!(food.nutrient_amount(2047), Some(120.0));
    }

    #[test]
    fn empty_search_payload_is_empty() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.foods.is_empty());
    }
}
