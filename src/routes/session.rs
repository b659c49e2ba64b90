// SPDX-License-Identifier: MIT

//! Session bridge endpoint.
//!
//! Bridges a client-held identity-provider session to server-trusted
//! HttpOnly cookies. The endpoint is stateless: all session state lives
//! in the cookies themselves, so concurrent establishes are independent
//! and the latest response's cookies win on the client.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::cookies::{
    build_cookie, clear_cookie, ACCESS_TOKEN_COOKIE, DEFAULT_ACCESS_TOKEN_MAX_AGE,
    REFRESH_TOKEN_COOKIE, REFRESH_TOKEN_MAX_AGE,
};
use crate::error::{AppError, Result};
use crate::{policy, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    // POST establishes, DELETE revokes; anything else is 405.
    Router::new().route(
        "/api/auth/session",
        post(establish_session).delete(revoke_session),
    )
}

/// Client-reported token pair. Everything optional: a missing field (or
/// an unparseable body) is a MissingTokens rejection, not a server error.
#[derive(Deserialize, Default)]
struct SessionTokens {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

/// Establish: verify the client-supplied access token with the identity
/// backend, apply the registration lock, then mint the two session
/// cookies. Cookies are only ever set after server-side re-verification.
async fn establish_session(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    let tokens: SessionTokens = serde_json::from_slice(&body).unwrap_or_default();

    let access_token = tokens.access_token.filter(|t| !t.is_empty());
    let refresh_token = tokens.refresh_token.filter(|t| !t.is_empty());
    let (Some(access_token), Some(refresh_token)) = (access_token, refresh_token) else {
        return Err(AppError::MissingTokens);
    };

    // Any verification failure, including backend outage, is a rejection.
    let user = state
        .db
        .verify_token(&access_token)
        .await
        .map_err(|_| AppError::InvalidToken)?;

    if !policy::is_admitted(&state.config, user.email.as_deref()) {
        tracing::info!(user_id = %user.id, "Session rejected: registration locked");
        return Err(AppError::RegistrationClosed);
    }

    let secure = state.config.production;
    let access_max_age = tokens.expires_in.unwrap_or(DEFAULT_ACCESS_TOKEN_MAX_AGE);

    tracing::info!(user_id = %user.id, "Session established");

    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(
            header::SET_COOKIE,
            build_cookie(ACCESS_TOKEN_COOKIE, &access_token, Some(access_max_age), secure),
        )
        .header(
            header::SET_COOKIE,
            build_cookie(
                REFRESH_TOKEN_COOKIE,
                &refresh_token,
                Some(REFRESH_TOKEN_MAX_AGE),
                secure,
            ),
        )
        .body(Body::empty())
        .map_err(|e| AppError::Internal(e.into()))
}

/// Revoke: always succeeds, unconditionally overwriting any prior session
/// cookies with immediately-expiring ones.
async fn revoke_session(State(state): State<Arc<AppState>>) -> Result<Response> {
    let secure = state.config.production;

    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::SET_COOKIE, clear_cookie(ACCESS_TOKEN_COOKIE, secure))
        .header(header::SET_COOKIE, clear_cookie(REFRESH_TOKEN_COOKIE, secure))
        .body(Body::empty())
        .map_err(|e| AppError::Internal(e.into()))
}
