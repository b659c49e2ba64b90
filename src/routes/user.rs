// SPDX-License-Identifier: MIT

//! Per-user data routes.
//!
//! Thin HTTP surface over the user data access layer. Reads return an
//! explicit null/empty value when there is no session or no row; writes
//! reject without a verified session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::db::userdata;
use crate::error::Result;
use crate::middleware::auth::SessionUser;
use crate::models::{ProfileUpdate, ProviderToken, UserApiKey, UserPreferences};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/user/preferences",
            get(get_preferences).put(put_preferences),
        )
        .route(
            "/api/user/api-keys/{provider}",
            get(get_api_key).put(put_api_key),
        )
        .route("/api/user/tokens/{provider}", get(get_token).put(put_token))
        .route("/api/user/provider-settings", get(get_provider_settings))
        .route(
            "/api/user/provider-settings/{provider}",
            put(put_provider_settings),
        )
        .route("/api/user/profile", put(put_profile))
        .route("/api/user/me", get(get_me))
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
) -> Result<Json<Option<Value>>> {
    let row = userdata::get_user(state.db.as_ref(), user.as_ref()).await?;
    Ok(Json(row))
}

async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
) -> Result<Json<Option<UserPreferences>>> {
    let prefs = userdata::get_user_preferences(state.db.as_ref(), user.as_ref()).await?;
    Ok(Json(prefs))
}

async fn put_preferences(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Json(prefs): Json<UserPreferences>,
) -> Result<StatusCode> {
    userdata::save_user_preferences(state.db.as_ref(), user.as_ref(), &prefs).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_api_key(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Path(provider): Path<String>,
) -> Result<Json<Option<UserApiKey>>> {
    let key = userdata::get_user_api_key(state.db.as_ref(), user.as_ref(), &provider).await?;
    Ok(Json(key))
}

#[derive(Deserialize)]
struct ApiKeyBody {
    api_key: String,
}

async fn put_api_key(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Path(provider): Path<String>,
    Json(body): Json<ApiKeyBody>,
) -> Result<StatusCode> {
    userdata::save_user_api_key(state.db.as_ref(), user.as_ref(), &provider, &body.api_key)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_token(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Path(provider): Path<String>,
) -> Result<Json<Option<ProviderToken>>> {
    let token = userdata::get_provider_token(state.db.as_ref(), user.as_ref(), &provider).await?;
    Ok(Json(token))
}

#[derive(Deserialize)]
struct TokenBody {
    token: String,
    username: Option<String>,
    extra: Option<Value>,
}

async fn put_token(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Path(provider): Path<String>,
    Json(body): Json<TokenBody>,
) -> Result<StatusCode> {
    userdata::save_provider_token(
        state.db.as_ref(),
        user.as_ref(),
        &provider,
        &body.token,
        body.username.as_deref(),
        body.extra.as_ref(),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_provider_settings(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
) -> Result<Json<Map<String, Value>>> {
    let settings = userdata::get_provider_settings(state.db.as_ref(), user.as_ref()).await?;
    Ok(Json(settings))
}

async fn put_provider_settings(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Path(provider): Path<String>,
    Json(settings): Json<Value>,
) -> Result<StatusCode> {
    userdata::save_provider_settings(state.db.as_ref(), user.as_ref(), &provider, &settings)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn put_profile(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Json(profile): Json<ProfileUpdate>,
) -> Result<StatusCode> {
    userdata::update_user_profile(state.db.as_ref(), user.as_ref(), &profile).await?;
    Ok(StatusCode::NO_CONTENT)
}
