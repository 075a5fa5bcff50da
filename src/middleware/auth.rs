// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase session authentication middleware.

use crate::services::AuthError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Cookie carrying the Firebase ID token (the name Firebase Hosting forwards).
pub const SESSION_COOKIE: &str = "__session";

/// Authenticated user extracted from the ID token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
}

/// Middleware that requires a valid Firebase ID token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return Err(StatusCode::UNAUTHORIZED),
        }
    };

    let user = state
        .auth_verifier
        .verify_id_token(&token)
        .await
        .map_err(|err| match err {
            AuthError::Invalid(reason) => {
                tracing::debug!(reason = %reason, "Rejected ID token");
                StatusCode::UNAUTHORIZED
            }
            AuthError::Transient(reason) => {
                tracing::error!(reason = %reason, "ID token verification transient failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })?;

    request.extensions_mut().insert(AuthUser {
        uid: user.uid,
        email: user.email,
    });

    Ok(next.run(request).await)
}
