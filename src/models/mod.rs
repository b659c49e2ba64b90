//! Data models for storage rows and wire payloads.

pub mod legacy;
pub mod user;

pub use legacy::{LegacyPayload, LegacyProfile, LegacyProviderToken};
pub use user::{ProfileUpdate, ProviderToken, UserApiKey, UserPreferences};
