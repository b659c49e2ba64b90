// SPDX-License-Identifier: MIT

//! Scoped CRUD over the per-user record kinds.
//!
//! Every function resolves "current user" from the verified session that
//! the caller passes in; the identity is injected into each row here and
//! is never taken from request payloads. Writes without a verified user
//! fail `NotAuthenticated`; reads without one (or with no matching row)
//! return an explicit absent value.

use crate::db::{tables, Backend, VerifiedUser};
use crate::error::{AppError, Result};
use crate::models::{ProfileUpdate, ProviderToken, UserApiKey, UserPreferences};
use serde_json::{json, Map, Value};

fn require_user(user: Option<&VerifiedUser>) -> Result<&VerifiedUser> {
    user.ok_or(AppError::NotAuthenticated)
}

/// Add the verified user id to a row about to be written.
fn scoped(user: &VerifiedUser, row: Value) -> Value {
    let mut row = match row {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    row.insert("user_id".to_string(), json!(user.id));
    Value::Object(row)
}

fn first_row<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Result<Option<T>> {
    match rows.into_iter().next() {
        Some(row) => serde_json::from_value(row)
            .map(Some)
            .map_err(|e| AppError::Backend(format!("unexpected row shape: {e}"))),
        None => Ok(None),
    }
}

/// Ensure a `users` row exists for the verified identity. Display name
/// and avatar come from the identity provider's profile metadata when
/// present; omitted fields are left untouched by the partial upsert.
pub async fn upsert_user_from_auth(db: &dyn Backend, user: &VerifiedUser) -> Result<()> {
    let mut row = Map::new();
    row.insert("id".to_string(), json!(user.id));
    if let Some(email) = &user.email {
        row.insert("email".to_string(), json!(email));
    }
    if let Some(name) = user.user_metadata.get("name").and_then(Value::as_str) {
        row.insert("display_name".to_string(), json!(name));
    }
    if let Some(avatar) = user.user_metadata.get("avatar_url").and_then(Value::as_str) {
        row.insert("avatar_url".to_string(), json!(avatar));
    }
    db.upsert(tables::USERS, "id", Value::Object(row)).await
}

/// Fetch the user's own `users` row. No session or no row yet is absent.
pub async fn get_user(db: &dyn Backend, user: Option<&VerifiedUser>) -> Result<Option<Value>> {
    let Some(user) = user else { return Ok(None) };
    let rows = db.select(tables::USERS, &[("id", &user.id)]).await?;
    Ok(rows.into_iter().next())
}

pub async fn save_provider_token(
    db: &dyn Backend,
    user: Option<&VerifiedUser>,
    provider: &str,
    token: &str,
    username: Option<&str>,
    extra: Option<&Value>,
) -> Result<()> {
    let user = require_user(user)?;
    let row = json!({
        "provider": provider,
        "token": token,
        "username": username,
        "extra": extra.cloned().unwrap_or_else(|| json!({})),
    });
    db.upsert(tables::PROVIDER_TOKENS, "user_id,provider", scoped(user, row))
        .await
}

pub async fn get_provider_token(
    db: &dyn Backend,
    user: Option<&VerifiedUser>,
    provider: &str,
) -> Result<Option<ProviderToken>> {
    let Some(user) = user else { return Ok(None) };
    let rows = db
        .select(
            tables::PROVIDER_TOKENS,
            &[("user_id", &user.id), ("provider", provider)],
        )
        .await?;
    first_row(rows)
}

pub async fn save_user_api_key(
    db: &dyn Backend,
    user: Option<&VerifiedUser>,
    provider: &str,
    api_key: &str,
) -> Result<()> {
    let user = require_user(user)?;
    let row = json!({ "provider": provider, "api_key": api_key });
    db.upsert(tables::USER_API_KEYS, "user_id,provider", scoped(user, row))
        .await
}

pub async fn get_user_api_key(
    db: &dyn Backend,
    user: Option<&VerifiedUser>,
    provider: &str,
) -> Result<Option<UserApiKey>> {
    let Some(user) = user else { return Ok(None) };
    let rows = db
        .select(
            tables::USER_API_KEYS,
            &[("user_id", &user.id), ("provider", provider)],
        )
        .await?;
    first_row(rows)
}

/// Partial-update preferences: only the fields present in `prefs` are
/// written, so concurrent sparse updates never null each other out.
pub async fn save_user_preferences(
    db: &dyn Backend,
    user: Option<&VerifiedUser>,
    prefs: &UserPreferences,
) -> Result<()> {
    let user = require_user(user)?;
    let row = serde_json::to_value(prefs).map_err(|e| AppError::Internal(e.into()))?;
    db.upsert(tables::USER_PREFERENCES, "user_id", scoped(user, row))
        .await
}

pub async fn get_user_preferences(
    db: &dyn Backend,
    user: Option<&VerifiedUser>,
) -> Result<Option<UserPreferences>> {
    let Some(user) = user else { return Ok(None) };
    let rows = db
        .select(tables::USER_PREFERENCES, &[("user_id", &user.id)])
        .await?;
    first_row(rows)
}

pub async fn save_provider_settings(
    db: &dyn Backend,
    user: Option<&VerifiedUser>,
    provider: &str,
    settings: &Value,
) -> Result<()> {
    let user = require_user(user)?;
    let row = json!({ "provider": provider, "settings": settings });
    db.upsert(tables::PROVIDER_SETTINGS, "user_id,provider", scoped(user, row))
        .await
}

/// Aggregate all provider-settings rows for the user into a
/// provider-name-to-settings map. No user or no rows yields an empty map.
pub async fn get_provider_settings(
    db: &dyn Backend,
    user: Option<&VerifiedUser>,
) -> Result<Map<String, Value>> {
    let Some(user) = user else {
        return Ok(Map::new());
    };
    let rows = db
        .select(tables::PROVIDER_SETTINGS, &[("user_id", &user.id)])
        .await?;

    let mut map = Map::new();
    for row in rows {
        if let Some(provider) = row.get("provider").and_then(Value::as_str) {
            map.insert(
                provider.to_string(),
                row.get("settings").cloned().unwrap_or(Value::Null),
            );
        }
    }
    Ok(map)
}

/// Partial upsert onto the `users` row.
pub async fn update_user_profile(
    db: &dyn Backend,
    user: Option<&VerifiedUser>,
    profile: &ProfileUpdate,
) -> Result<()> {
    let user = require_user(user)?;
    let mut row = match serde_json::to_value(profile).map_err(|e| AppError::Internal(e.into()))? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    row.insert("id".to_string(), json!(user.id));
    if let Some(email) = &user.email {
        row.insert("email".to_string(), json!(email));
    }
    db.upsert(tables::USERS, "id", Value::Object(row)).await
}
