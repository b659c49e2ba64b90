// SPDX-License-Identifier: MIT

use bolt_gateway::config::Config;
use bolt_gateway::db::{Backend, MemoryBackend, VerifiedUser};
use bolt_gateway::routes::create_router;
use bolt_gateway::AppState;
use serde_json::json;
use std::sync::Arc;

/// A verified identity the fake backend will resolve for tests.
#[allow(dead_code)]
pub fn test_user() -> VerifiedUser {
    VerifiedUser {
        id: "user-1".to_string(),
        email: Some("alice@example.com".to_string()),
        user_metadata: json!({ "name": "Alice", "avatar_url": "https://example.com/a.png" }),
    }
}

/// Create a test app over the in-memory backend.
/// Returns the router and the backend for registering tokens/assertions.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<MemoryBackend>) {
    create_test_app_with_config(Config::default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let state = Arc::new(AppState {
        config,
        db: backend.clone() as Arc<dyn Backend>,
    });
    (create_router(state), backend)
}
