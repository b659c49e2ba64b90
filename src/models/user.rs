//! Per-user row types.
//!
//! None of these carry a `user_id` field on the API surface: the storage
//! layer injects the verified session identity into every row it writes,
//! so a client-supplied identity can never reach the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Credential for an external provider (e.g. a GitHub PAT).
/// Unique per (user, provider); upsert replaces on conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderToken {
    pub provider: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

/// Model-provider API key. Unique per (user, provider).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserApiKey {
    pub provider: String,
    pub api_key: String,
}

/// User preferences row. All fields optional so a sparse update never
/// nulls out columns it does not mention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_debug_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Partial update onto the `users` row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
