// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use coaching_nutrition::config::Config;
use coaching_nutrition::db::FirestoreDb;
use coaching_nutrition::routes::create_router;
use coaching_nutrition::services::FirebaseAuthVerifier;
use coaching_nutrition::AppState;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Key ID the static test verifier accepts.
#[allow(dead_code)]
pub const TEST_KID: &str = "test-key-1";

#[allow(dead_code)]
pub const TEST_PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/test_rsa_private.pem");
#[allow(dead_code)]
pub const TEST_PUBLIC_KEY: &[u8] = include_bytes!("../fixtures/test_rsa_public.pem");
/// A key the verifier does not trust.
#[allow(dead_code)]
pub const OTHER_PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/other_rsa_private.pem");

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Verifier that trusts only the fixture public key.
#[allow(dead_code)]
pub fn test_verifier(config: &Config) -> Arc<FirebaseAuthVerifier> {
    let key = DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY).expect("fixture public key");
    Arc::new(
        FirebaseAuthVerifier::new_with_static_key(config, TEST_KID, key)
            .expect("Failed to build test verifier"),
    )
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Same as [`create_test_app`] but with a caller-supplied config, e.g. one
/// pointing the upstream base URLs at a [`spawn_stub_server`].
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let verifier = test_verifier(&config);
    let state = Arc::new(AppState::new(config, test_db_offline(), verifier));

    (create_router(state.clone()), state)
}

#[derive(Serialize)]
struct TestClaims {
    iss: String,
    aud: String,
    sub: String,
    iat: u64,
    exp: u64,
    auth_time: u64,
    email: Option<String>,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Sign an ID token for `uid` the way Firebase would for `project_id`.
#[allow(dead_code)]
pub fn create_test_id_token(uid: &str, project_id: &str) -> String {
    sign_id_token(uid, project_id, TEST_KID, TEST_PRIVATE_KEY, now_secs() + 3600)
}

/// Sign an ID token with full control over the key and expiry.
#[allow(dead_code)]
pub fn sign_id_token(
    uid: &str,
    project_id: &str,
    kid: &str,
    private_key_pem: &[u8],
    exp: u64,
) -> String {
    let now = now_secs();
    let claims = TestClaims {
        iss: format!("https://securetoken.google.com/{}", project_id),
        aud: project_id.to_string(),
        sub: uid.to_string(),
        iat: now.min(exp),
        exp,
        auth_time: now.min(exp),
        email: Some(format!("{}@example.com", uid)),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());

    encode(
        &header,
        &claims,
        &EncodingKey::from_rsa_pem(private_key_pem).expect("fixture private key"),
    )
    .expect("Failed to sign test ID token")
}

/// Serve `router` on an ephemeral local port and return its base URL.
/// Used to stand in for the USDA and Gemini APIs.
#[allow(dead_code)]
pub async fn spawn_stub_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app(config: Config) -> (axum::Router, Arc<AppState>) {
    let verifier = test_verifier(&config);
    let state = Arc::new(AppState::new(config, test_db().await, verifier));

    (create_router(state.clone()), state)
}

/// Unique suffix for test isolation against a shared emulator.
#[allow(dead_code)]
pub fn unique_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64
}
