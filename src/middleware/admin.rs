// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin authorization backed by the `admins` Firestore collection.
//!
//! Must run after [`require_auth`](super::auth::require_auth).

use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Allow the request only if the caller's uid has an admin grant.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(user) = request.extensions().get::<AuthUser>().cloned() else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    match state.db.get_admin_grant(&user.uid).await {
        Ok(Some(grant)) => {
            tracing::info!(
                uid = %user.uid,
                granted_by = %grant.granted_by,
                method = %request.method(),
                path = %request.uri().path(),
                "Admin request authorized"
            );
            Ok(next.run(request).await)
        }
        Ok(None) => {
            tracing::warn!(uid = %user.uid, "Blocked admin request from non-admin");
            Err(StatusCode::FORBIDDEN)
        }
        Err(e) => {
            // Fail closed.
            tracing::error!(error = %e, uid = %user.uid, "Admin lookup failed");
            Err(StatusCode::FORBIDDEN)
        }
    }
}
