// SPDX-License-Identifier: MIT

//! One-time legacy migration endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::legacy;
use crate::middleware::auth::SessionUser;
use crate::migration::import_legacy;
use crate::models::LegacyPayload;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/migrate-legacy", post(migrate_legacy))
}

#[derive(Serialize)]
struct MigrateResponse {
    migrated: bool,
}

/// Import the client's legacy state into the per-user rows.
///
/// Requires an established session. The posted payload is authoritative;
/// legacy cookies still present on this request fill in anything the
/// client left out. On success the response also expires every legacy
/// cookie, so the pre-migration state is cleared exactly once. A retry
/// after failure still sees it all intact.
async fn migrate_legacy(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(HeaderMap, Json<MigrateResponse>)> {
    let user = user.ok_or(AppError::NotAuthenticated)?;

    let posted: LegacyPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::MigrationFailed(format!("invalid payload: {e}")))?;

    let cookie_header = headers.get(header::COOKIE).and_then(|h| h.to_str().ok());
    let payload = posted.merge_missing(legacy::collect_legacy_state(cookie_header, None));

    import_legacy(state.db.as_ref(), &user, &payload).await?;

    let mut response_headers = HeaderMap::new();
    for cookie in legacy::clearing_cookies(state.config.production) {
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid clearing cookie: {e}")))?;
        response_headers.append(header::SET_COOKIE, value);
    }

    Ok((response_headers, Json(MigrateResponse { migrated: true })))
}
