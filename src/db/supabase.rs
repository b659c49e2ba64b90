// SPDX-License-Identifier: MIT

//! Supabase client wrapper with typed operations.
//!
//! Talks to two surfaces of the same project:
//! - GoTrue (`/auth/v1/user`) to resolve access tokens to identities
//! - PostgREST (`/rest/v1/{table}`) for unique-key upserts and selects

use crate::config::Config;
use crate::db::{Backend, VerifiedUser};
use crate::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Supabase backend client.
#[derive(Clone)]
pub struct SupabaseDb {
    http_client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

/// Shape of a GoTrue user response; only the fields the bridge needs.
#[derive(Deserialize)]
struct AuthUserResponse {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
}

impl SupabaseDb {
    /// Create a new Supabase client from configuration.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| AppError::Backend(format!("Failed to build HTTP client: {e}")))?;

        tracing::info!(url = %config.supabase_url, "Supabase backend configured");

        Ok(Self {
            http_client,
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

#[async_trait]
impl Backend for SupabaseDb {
    async fn verify_token(&self, access_token: &str) -> Result<VerifiedUser, AppError> {
        let response = self
            .http_client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Token verification request failed");
                AppError::InvalidToken
            })?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Backend rejected access token");
            return Err(AppError::InvalidToken);
        }

        let user: AuthUserResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Unparseable auth user response");
            AppError::InvalidToken
        })?;

        Ok(VerifiedUser {
            id: user.id,
            email: user.email,
            user_metadata: user.user_metadata,
        })
    }

    async fn upsert(&self, table: &str, on_conflict: &str, row: Value) -> Result<(), AppError> {
        let response = self
            .http_client
            .post(self.rest_url(table))
            .query(&[("on_conflict", on_conflict)])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            // merge-duplicates updates only the columns present in the row
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("upsert into {table} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Backend(format!(
                "upsert into {table} returned {status}: {body}"
            )));
        }

        Ok(())
    }

    async fn select(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<Value>, AppError> {
        let mut request = self
            .http_client
            .get(self.rest_url(table))
            .query(&[("select", "*")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key);

        for (column, value) in filters {
            request = request.query(&[(*column, format!("eq.{value}"))]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("select from {table} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Backend(format!(
                "select from {table} returned {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("invalid rows from {table}: {e}")))
    }
}
