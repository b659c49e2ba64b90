// SPDX-License-Identifier: MIT

//! Session resolution middleware.
//!
//! Re-derives the current user from the access-token cookie on every
//! request. The verified identity (or its absence) is attached as a
//! request extension; handlers decide whether absence is an error, so
//! read paths can degrade to "no data" while write paths reject.

use crate::cookies::{read_cookie, ACCESS_TOKEN_COOKIE};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::db::VerifiedUser;

/// The session's verified user, if any. Never trusted from caller input;
/// always re-derived from the token on this request.
#[derive(Debug, Clone)]
pub struct SessionUser(pub Option<VerifiedUser>);

/// Resolve the session for this request. Never rejects by itself: an
/// absent or invalid token simply yields an unauthenticated session.
pub async fn resolve_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_header = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    // Cookie first, then bearer header (for non-browser clients).
    let token = read_cookie(ACCESS_TOKEN_COOKIE, cookie_header.as_deref()).or_else(|| {
        request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    });

    let user = match token {
        Some(token) => match state.db.verify_token(&token).await {
            Ok(user) => Some(user),
            Err(_) => {
                tracing::debug!("Session token failed verification");
                None
            }
        },
        None => None,
    };

    request.extensions_mut().insert(SessionUser(user));
    next.run(request).await
}
