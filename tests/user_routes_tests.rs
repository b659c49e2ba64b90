// SPDX-License-Identifier: MIT

//! Per-user data route tests: session resolution from cookies, write
//! rejection without a session, and null reads for missing rows.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

mod common;

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_get_preferences_without_session_is_null() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/preferences")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, Value::Null);
}

#[tokio::test]
async fn test_put_preferences_without_session_is_unauthorized() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/user/preferences")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"theme": "dark"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_preferences_round_trip_via_session_cookie() {
    let (app, backend) = common::create_test_app();
    backend.register_token("valid-token", common::test_user());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/user/preferences")
                .header(header::COOKIE, "sb-access-token=valid-token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"selected_provider": "openai"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/preferences")
                .header(header::COOKIE, "sb-access-token=valid-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["selected_provider"], "openai");
}

#[tokio::test]
async fn test_stale_session_cookie_reads_as_absent() {
    let (app, _) = common::create_test_app();

    // Cookie present but the backend no longer accepts the token
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/provider-settings")
                .header(header::COOKIE, "sb-access-token=expired")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({}));
}

#[tokio::test]
async fn test_me_reflects_profile_writes() {
    let (app, backend) = common::create_test_app();
    backend.register_token("valid-token", common::test_user());

    // No users row yet
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/user/me")
                .header(header::COOKIE, "sb-access-token=valid-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, Value::Null);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/user/profile")
                .header(header::COOKIE, "sb-access-token=valid-token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"bio": "hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/me")
                .header(header::COOKIE, "sb-access-token=valid-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["id"], "user-1");
    assert_eq!(body["bio"], "hello");
}

#[tokio::test]
async fn test_bearer_header_fallback() {
    let (app, backend) = common::create_test_app();
    backend.register_token("valid-token", common::test_user());

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/user/api-keys/openai")
                .header(header::AUTHORIZATION, "Bearer valid-token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"api_key": "sk-x"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(backend.table("user_api_keys").len(), 1);
}
