//! Identity/storage backend seam.
//!
//! The core protocol logic only ever sees this narrow interface: verify an
//! opaque token, upsert a row on a unique key, select rows by equality
//! filters. `SupabaseDb` implements it against the real backend;
//! `MemoryBackend` is a working in-memory fake for tests.

pub mod memory;
pub mod supabase;
pub mod userdata;

pub use memory::MemoryBackend;
pub use supabase::SupabaseDb;

use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// Table names as constants.
pub mod tables {
    pub const USERS: &str = "users";
    pub const PROVIDER_TOKENS: &str = "provider_tokens";
    pub const USER_API_KEYS: &str = "user_api_keys";
    pub const USER_PREFERENCES: &str = "user_preferences";
    pub const PROVIDER_SETTINGS: &str = "provider_settings";
}

/// Identity resolved from a verified access token. The `id` is the
/// identity provider's stable subject and is immutable.
#[derive(Debug, Clone)]
pub struct VerifiedUser {
    pub id: String,
    pub email: Option<String>,
    /// Provider-supplied profile metadata (display name, avatar, ...).
    pub user_metadata: Value,
}

/// Narrow backend interface for token verification and row storage.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Resolve an opaque access token to a user identity.
    ///
    /// Tokens are never cached and rejections are never retried here; any
    /// backend error (including transport failure) counts as rejection.
    async fn verify_token(&self, access_token: &str) -> Result<VerifiedUser, AppError>;

    /// Insert-or-update a row. `on_conflict` names the unique key columns
    /// (comma-separated); on conflict only the columns present in `row`
    /// are overwritten, so sparse rows never null out omitted columns.
    async fn upsert(&self, table: &str, on_conflict: &str, row: Value) -> Result<(), AppError>;

    /// Select rows matching all equality filters. No matching rows is an
    /// empty vector, never an error.
    async fn select(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<Value>, AppError>;
}
