// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication and admin authorization tests for protected routes.
//!
//! With the offline database every authenticated request that reaches a
//! handler fails with a 500, which is how these tests tell "auth passed"
//! apart from "auth rejected".

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_id_token, sign_id_token, OTHER_PRIVATE_KEY, TEST_KID};

const UID: &str = "client-uid-123";

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

// ═══════════════════════════════════════════════════════════════════════════
// AUTHENTICATION
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_food_log_requires_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/food-log")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_by_untrusted_key_is_rejected() {
    let (app, state) = common::create_test_app();
    let token = sign_id_token(
        UID,
        &state.config.gcp_project_id,
        TEST_KID,
        OTHER_PRIVATE_KEY,
        now_secs() + 3600,
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/food-log")
                .header(header::AUTHORIZATION, bearer(&token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_other_project_is_rejected() {
    let (app, _) = common::create_test_app();
    let token = create_test_id_token(UID, "some-other-project");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/food-log")
                .header(header::AUTHORIZATION, bearer(&token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let (app, state) = common::create_test_app();
    let token = sign_id_token(
        UID,
        &state.config.gcp_project_id,
        TEST_KID,
        common::TEST_PRIVATE_KEY,
        now_secs() - 3600,
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/food-log")
                .header(header::AUTHORIZATION, bearer(&token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_kid_is_rejected() {
    let (app, state) = common::create_test_app();
    let token = sign_id_token(
        UID,
        &state.config.gcp_project_id,
        "rotated-away",
        common::TEST_PRIVATE_KEY,
        now_secs() + 3600,
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/food-log")
                .header(header::AUTHORIZATION, bearer(&token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_bearer_token_reaches_handler() {
    let (app, state) = common::create_test_app();
    let token = create_test_id_token(UID, &state.config.gcp_project_id);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/food-log?date=2026-03-01")
                .header(header::AUTHORIZATION, bearer(&token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Offline database: the handler ran and failed on the query.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "database_error");
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let (app, state) = common::create_test_app();
    let token = create_test_id_token(UID, &state.config.gcp_project_id);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/food-log")
                .header(header::COOKIE, format!("__session={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ═══════════════════════════════════════════════════════════════════════════
// FOOD LOG VALIDATION (after auth)
// ═══════════════════════════════════════════════════════════════════════════

async fn post_food_log(body: serde_json::Value) -> StatusCode {
    let (app, state) = common::create_test_app();
    let token = create_test_id_token(UID, &state.config.gcp_project_id);

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/food-log")
            .header(header::AUTHORIZATION, bearer(&token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
    .status()
}

#[tokio::test]
async fn test_food_log_rejects_non_positive_grams() {
    let status = post_food_log(json!({"fdcId": 171077, "meal": "lunch", "grams": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = post_food_log(json!({"fdcId": 171077, "meal": "lunch", "grams": -20})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_food_log_rejects_excessive_grams() {
    let status = post_food_log(json!({"fdcId": 171077, "meal": "lunch", "grams": 5001})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_food_log_rejects_unknown_meal() {
    let status = post_food_log(json!({"fdcId": 171077, "meal": "brunch", "grams": 100})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_food_log_rejects_bad_date() {
    let status = post_food_log(json!({
        "fdcId": 171077,
        "meal": "dinner",
        "grams": 100,
        "date": "yesterday"
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_food_log_list_rejects_bad_date() {
    let (app, state) = common::create_test_app();
    let token = create_test_id_token(UID, &state.config.gcp_project_id);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/food-log?date=2026-13-01")
                .header(header::AUTHORIZATION, bearer(&token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ═══════════════════════════════════════════════════════════════════════════
// ADMIN
// ═══════════════════════════════════════════════════════════════════════════

fn admin_settings_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PUT")
        .uri("/api/admin/settings")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    builder
        .body(Body::from(json!({"ai_model": "gemini-2.0-flash"}).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_admin_requires_token() {
    let (app, _) = common::create_test_app();

    let response = app.oneshot(admin_settings_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_lookup_failure_is_forbidden() {
    let (app, state) = common::create_test_app();
    let token = create_test_id_token(UID, &state.config.gcp_project_id);

    let response = app
        .oneshot(admin_settings_request(Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_embedding_route_requires_admin() {
    let (app, state) = common::create_test_app();
    let token = create_test_id_token(UID, &state.config.gcp_project_id);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/foods/171077/embedding")
                .header(header::AUTHORIZATION, bearer(&token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC SETTINGS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_public_settings_fall_back_to_defaults() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/settings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ai_model"], "");
    assert_eq!(body["scheduling_link"], "");
    assert_eq!(body["availability"], "");
}
