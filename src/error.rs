// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Session establishment request is missing one or both tokens
    /// (also covers unparseable request bodies).
    #[error("Missing tokens")]
    MissingTokens,

    /// The identity backend rejected the access token, or verification
    /// itself failed. Never retried here; the client must refresh first.
    #[error("Invalid access token")]
    InvalidToken,

    /// The identity is valid but registration is locked and the email is
    /// not on the admin allowlist.
    #[error("Registration disabled")]
    RegistrationClosed,

    /// A write operation was attempted without a verified session.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A row write failed during legacy import; the whole import aborts.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Backend (auth/storage) error other than "no matching row".
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::MissingTokens => (StatusCode::BAD_REQUEST, "Missing tokens", None),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid Supabase access token",
                None,
            ),
            AppError::RegistrationClosed => {
                (StatusCode::UNAUTHORIZED, "Registration disabled", None)
            }
            AppError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "Not authenticated", None),
            AppError::MigrationFailed(msg) => {
                tracing::error!(error = %msg, "Migration failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Migration failed", None)
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Backend(msg) => {
                tracing::error!(error = %msg, "Backend error");
                (StatusCode::BAD_GATEWAY, "backend_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
