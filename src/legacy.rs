// SPDX-License-Identifier: MIT

//! Legacy state collection.
//!
//! Before the relational store existed, credentials and preferences lived
//! in client-local cookies plus one local-storage profile blob. This
//! module snapshots that fixed set of names into a canonical
//! [`LegacyPayload`] and produces the Set-Cookie headers that clear the
//! legacy cookies once a migration has succeeded.
//!
//! Collection is best-effort by contract: any individual value that fails
//! to parse is dropped and the rest of the payload survives.

use crate::cookies::clear_cookie;
use crate::models::{LegacyPayload, LegacyProfile, LegacyProviderToken};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Every legacy cookie consumed (and cleared) by the migration.
pub const LEGACY_COOKIE_NAMES: [&str; 13] = [
    "apiKeys",
    "providers",
    "selectedProvider",
    "selectedModel",
    "isDebugEnabled",
    "cachedPrompt",
    "githubToken",
    "githubUsername",
    "git:github.com",
    "gitlabToken",
    "gitlabUrl",
    "VITE_VERCEL_ACCESS_TOKEN",
    "netlifyToken",
];

/// Local-storage key holding the legacy profile blob. Only the client can
/// read it, so it arrives inside the posted payload rather than a cookie.
pub const LEGACY_PROFILE_KEY: &str = "bolt_profile";

/// Client-local marker set after a successful migration. Purely a
/// cost-saving skip: the importer stays idempotent because concurrent
/// tabs can race this flag.
pub const MIGRATED_FLAG_KEY: &str = "legacy_migrated";

/// Parse a raw Cookie header into a name/value map: split on `;`, trim,
/// split each segment on the first `=`, URL-decode the value.
fn cookie_map(raw_header: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for part in raw_header.split(';') {
        let part = part.trim();
        let Some((name, value)) = part.split_once('=') else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let value = urlencoding::decode(value)
            .map(|c| c.into_owned())
            .unwrap_or_else(|_| value.to_string());
        map.insert(name.to_string(), value);
    }
    map
}

fn non_empty(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.is_empty())
}

/// Assemble a [`LegacyPayload`] from the legacy cookies and the
/// local-storage profile blob. Never fails; unparseable fields are
/// silently omitted.
pub fn collect_legacy_state(
    cookie_header: Option<&str>,
    profile_blob: Option<&str>,
) -> LegacyPayload {
    let cookies = cookie_header.map(cookie_map).unwrap_or_default();

    let mut payload = LegacyPayload {
        api_keys: cookies
            .get("apiKeys")
            .and_then(|v| serde_json::from_str::<HashMap<String, String>>(v).ok()),
        provider_settings: cookies
            .get("providers")
            .and_then(|v| serde_json::from_str::<HashMap<String, Value>>(v).ok()),
        selected_provider: non_empty(cookies.get("selectedProvider")).cloned(),
        selected_model: non_empty(cookies.get("selectedModel")).cloned(),
        // Only the literal string "true" ever counted as enabled.
        is_debug_enabled: cookies.get("isDebugEnabled").map(|v| v == "true"),
        default_prompt: non_empty(cookies.get("cachedPrompt")).cloned(),
        provider_tokens: None,
        profile: profile_blob.and_then(parse_profile_blob),
    };

    let mut tokens = Vec::new();
    if let Some(token) = non_empty(cookies.get("githubToken")) {
        tokens.push(LegacyProviderToken {
            provider: "github".to_string(),
            token: token.clone(),
            username: non_empty(cookies.get("githubUsername")).cloned(),
            extra: None,
        });
    }
    if let Some(raw) = non_empty(cookies.get("git:github.com")) {
        tokens.push(LegacyProviderToken {
            provider: "github".to_string(),
            token: raw.clone(),
            username: None,
            extra: Some(json!({ "raw": raw })),
        });
    }
    if let Some(token) = non_empty(cookies.get("gitlabToken")) {
        tokens.push(LegacyProviderToken {
            provider: "gitlab".to_string(),
            token: token.clone(),
            username: None,
            extra: non_empty(cookies.get("gitlabUrl")).map(|url| json!({ "url": url })),
        });
    }
    if let Some(token) = non_empty(cookies.get("VITE_VERCEL_ACCESS_TOKEN")) {
        tokens.push(LegacyProviderToken {
            provider: "vercel".to_string(),
            token: token.clone(),
            username: None,
            extra: None,
        });
    }
    if let Some(token) = non_empty(cookies.get("netlifyToken")) {
        tokens.push(LegacyProviderToken {
            provider: "netlify".to_string(),
            token: token.clone(),
            username: None,
            extra: None,
        });
    }
    if !tokens.is_empty() {
        payload.provider_tokens = Some(tokens);
    }

    payload
}

fn parse_profile_blob(blob: &str) -> Option<LegacyProfile> {
    let value: Value = serde_json::from_str(blob).ok()?;
    let field = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    Some(LegacyProfile {
        display_name: field("username"),
        bio: field("bio"),
        avatar_url: field("avatar"),
    })
}

/// Set-Cookie headers expiring every legacy cookie, emitted after a
/// successful migration.
pub fn clearing_cookies(secure: bool) -> Vec<String> {
    LEGACY_COOKIE_NAMES
        .iter()
        .map(|name| clear_cookie(name, secure))
        .collect()
}
