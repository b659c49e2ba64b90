// SPDX-License-Identifier: MIT

//! Legacy migration importer.
//!
//! Writes a canonical legacy payload into the per-user rows. Every step
//! is an upsert on a unique key, so the whole import is safe to repeat:
//! the client-side migrated flag is only an optimization, and a retry
//! after a partial failure converges to the same row states.

use crate::db::{userdata, Backend, VerifiedUser};
use crate::error::{AppError, Result};
use crate::models::{LegacyPayload, UserPreferences};

/// Import a legacy payload for the verified user.
///
/// All writes are scoped to the verified identity; whatever the payload
/// claims about who it belongs to is ignored. Any single write failure
/// aborts the import and surfaces `MigrationFailed`, leaving the client's
/// legacy state (and its migrated flag) untouched for a later retry.
pub async fn import_legacy(
    db: &dyn Backend,
    user: &VerifiedUser,
    payload: &LegacyPayload,
) -> Result<()> {
    import_inner(db, user, payload)
        .await
        .map_err(|e| AppError::MigrationFailed(e.to_string()))
}

async fn import_inner(db: &dyn Backend, user: &VerifiedUser, payload: &LegacyPayload) -> Result<()> {
    // Ensure the users row exists before anything references it.
    userdata::upsert_user_from_auth(db, user).await?;

    let prefs = UserPreferences {
        selected_provider: payload.selected_provider.clone(),
        selected_model: payload.selected_model.clone(),
        is_debug_enabled: payload.is_debug_enabled,
        default_prompt: payload.default_prompt.clone(),
        theme: None,
    };
    userdata::save_user_preferences(db, Some(user), &prefs).await?;

    if let Some(api_keys) = &payload.api_keys {
        for (provider, key) in api_keys {
            if key.is_empty() {
                continue;
            }
            userdata::save_user_api_key(db, Some(user), provider, key).await?;
        }
    }

    if let Some(tokens) = &payload.provider_tokens {
        for token in tokens {
            if token.token.is_empty() {
                continue;
            }
            userdata::save_provider_token(
                db,
                Some(user),
                &token.provider,
                &token.token,
                token.username.as_deref(),
                token.extra.as_ref(),
            )
            .await?;
        }
    }

    if let Some(profile) = &payload.profile {
        if profile.display_name.is_some() || profile.bio.is_some() || profile.avatar_url.is_some()
        {
            let update = crate::models::ProfileUpdate {
                display_name: profile.display_name.clone(),
                bio: profile.bio.clone(),
                avatar_url: profile.avatar_url.clone(),
            };
            userdata::update_user_profile(db, Some(user), &update).await?;
        }
    }

    tracing::info!(user_id = %user.id, "Legacy state imported");
    Ok(())
}
