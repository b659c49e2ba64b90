//! Legacy client-local state, as posted by clients that predate the
//! per-user relational store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Snapshot of pre-migration client-local credential and preference
/// state. Consumed exactly once by the migration importer; every field is
/// optional because individual legacy values may be absent or unparseable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_keys: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_settings: Option<HashMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_debug_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_tokens: Option<Vec<LegacyProviderToken>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<LegacyProfile>,
}

/// Provider token reconstructed from a provider-specific legacy cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyProviderToken {
    pub provider: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

/// Profile fields from the legacy local-storage blob. Keys here are
/// snake_case on the wire, unlike the camelCase payload envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyProfile {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl LegacyPayload {
    /// Fill fields this payload is missing from `fallback`. Used to merge
    /// the client-posted payload (authoritative) with whatever legacy
    /// cookies arrived on the request itself.
    pub fn merge_missing(mut self, fallback: LegacyPayload) -> Self {
        self.api_keys = self.api_keys.or(fallback.api_keys);
        self.provider_settings = self.provider_settings.or(fallback.provider_settings);
        self.selected_provider = self.selected_provider.or(fallback.selected_provider);
        self.selected_model = self.selected_model.or(fallback.selected_model);
        self.is_debug_enabled = self.is_debug_enabled.or(fallback.is_debug_enabled);
        self.default_prompt = self.default_prompt.or(fallback.default_prompt);
        self.provider_tokens = self.provider_tokens.or(fallback.provider_tokens);
        self.profile = self.profile.or(fallback.profile);
        self
    }
}
