// SPDX-License-Identifier: MIT

//! Legacy migration endpoint tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use bolt_gateway::legacy::LEGACY_COOKIE_NAMES;
use serde_json::Value;
use tower::ServiceExt;

mod common;

fn migrate_request(cookie: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/migrate-legacy")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie.to_string())
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_migrate_end_to_end() {
    let (app, backend) = common::create_test_app();
    backend.register_token("valid-token", common::test_user());

    let payload = r#"{
        "apiKeys": {"openai": "sk-x"},
        "selectedProvider": "openai",
        "providerTokens": [{"provider": "github", "token": "ghp_y", "username": "alice"}]
    }"#;

    let response = app
        .oneshot(migrate_request("sb-access-token=valid-token", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // Every legacy cookie gets expired on success
    let cleared: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cleared.len(), LEGACY_COOKIE_NAMES.len());
    assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));

    let body = json_body(response).await;
    assert_eq!(body["migrated"], true);

    let users = backend.table("users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], "user-1");
    assert_eq!(users[0]["email"], "alice@example.com");

    let keys = backend.table("user_api_keys");
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["user_id"], "user-1");
    assert_eq!(keys[0]["provider"], "openai");
    assert_eq!(keys[0]["api_key"], "sk-x");

    let prefs = backend.table("user_preferences");
    assert_eq!(prefs.len(), 1);
    assert_eq!(prefs[0]["selected_provider"], "openai");
    assert!(prefs[0].get("selected_model").is_none());

    let tokens = backend.table("provider_tokens");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0]["provider"], "github");
    assert_eq!(tokens[0]["token"], "ghp_y");
    assert_eq!(tokens[0]["username"], "alice");
}

#[tokio::test]
async fn test_migrate_twice_is_idempotent() {
    let (app, backend) = common::create_test_app();
    backend.register_token("valid-token", common::test_user());

    let payload = r#"{
        "apiKeys": {"openai": "sk-x", "anthropic": "sk-y"},
        "selectedProvider": "openai",
        "isDebugEnabled": true,
        "providerTokens": [{"provider": "github", "token": "ghp_y"}]
    }"#;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(migrate_request("sb-access-token=valid-token", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(backend.table("users").len(), 1);
    assert_eq!(backend.table("user_api_keys").len(), 2);
    assert_eq!(backend.table("user_preferences").len(), 1);
    assert_eq!(backend.table("provider_tokens").len(), 1);
    assert_eq!(backend.table("provider_tokens")[0]["token"], "ghp_y");
}

#[tokio::test]
async fn test_migrate_requires_session() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/migrate-legacy")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_migrate_write_failure_reports_500_and_clears_nothing() {
    let (app, backend) = common::create_test_app();
    backend.register_token("valid-token", common::test_user());
    backend.set_fail_writes(true);

    let response = app
        .oneshot(migrate_request(
            "sb-access-token=valid-token",
            r#"{"apiKeys": {"openai": "sk-x"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    // No legacy cookies are expired on failure; the client retries later.
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = json_body(response).await;
    assert_eq!(body["error"], "Migration failed");
    assert!(backend.table("user_api_keys").is_empty());
}

#[tokio::test]
async fn test_migrate_picks_up_legacy_cookies_from_request() {
    let (app, backend) = common::create_test_app();
    backend.register_token("valid-token", common::test_user());

    // Client posted an empty payload; the legacy cookies riding along on
    // the request still get migrated.
    let cookie = "sb-access-token=valid-token; selectedModel=gpt-4; githubToken=ghp_z; githubUsername=bob";
    let response = app.oneshot(migrate_request(cookie, "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let prefs = backend.table("user_preferences");
    assert_eq!(prefs[0]["selected_model"], "gpt-4");

    let tokens = backend.table("provider_tokens");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0]["token"], "ghp_z");
    assert_eq!(tokens[0]["username"], "bob");
}

#[tokio::test]
async fn test_migrate_posted_payload_wins_over_cookies() {
    let (app, backend) = common::create_test_app();
    backend.register_token("valid-token", common::test_user());

    let cookie = "sb-access-token=valid-token; selectedProvider=cookie-provider";
    let response = app
        .oneshot(migrate_request(cookie, r#"{"selectedProvider": "posted-provider"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        backend.table("user_preferences")[0]["selected_provider"],
        "posted-provider"
    );
}

#[tokio::test]
async fn test_migrate_profile_updates_user_row() {
    let (app, backend) = common::create_test_app();
    backend.register_token("valid-token", common::test_user());

    let payload = r#"{"profile": {"display_name": "Alice B", "bio": "hello"}}"#;
    let response = app
        .oneshot(migrate_request("sb-access-token=valid-token", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let users = backend.table("users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["display_name"], "Alice B");
    assert_eq!(users[0]["bio"], "hello");
    assert_eq!(users[0]["email"], "alice@example.com");
}
