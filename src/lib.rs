// SPDX-License-Identifier: MIT

//! Bolt Gateway: bridges identity-provider sessions to server-trusted
//! HttpOnly cookies and migrates pre-existing client-local state into the
//! per-user relational store.

pub mod config;
pub mod cookies;
pub mod db;
pub mod error;
pub mod legacy;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod policy;
pub mod routes;

use config::Config;
use db::Backend;
use std::sync::Arc;

/// Shared application state. There is no in-process mutable state: all
/// persisted state lives in the backend, all session state in cookies.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn Backend>,
}
