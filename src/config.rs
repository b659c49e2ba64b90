//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup and kept in memory; there is no
//! per-request configuration lookup.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Supabase project URL (auth + REST backend)
    pub supabase_url: String,
    /// Supabase anon (public) API key
    pub supabase_anon_key: String,
    /// Frontend URL allowed for CORS with credentials
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Whether the deployment is production (controls the Secure cookie
    /// attribute)
    pub production: bool,
    /// Whether new-user registration is open
    pub registration_enabled: bool,
    /// Lower-cased admin emails admitted even when registration is locked
    pub primary_admins: Vec<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test_anon_key".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            production: false,
            registration_enabled: true,
            primary_admins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            supabase_url: env::var("SUPABASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            production: env::var("ENVIRONMENT")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            registration_enabled: registration_enabled_from(
                env::var("USER_REGISTRATION_ENABLED").ok().as_deref(),
            ),
            primary_admins: parse_admin_list(env::var("PRIMARY_ADMINS").ok().as_deref()),
        })
    }
}

/// Unset or anything other than the string "false" (case-insensitive)
/// leaves registration open.
fn registration_enabled_from(value: Option<&str>) -> bool {
    !value
        .map(|v| v.trim().eq_ignore_ascii_case("false"))
        .unwrap_or(false)
}

/// Parse the comma-separated admin allowlist: trimmed, lower-cased,
/// empty entries dropped.
fn parse_admin_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
