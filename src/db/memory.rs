// SPDX-License-Identifier: MIT

//! In-memory backend fake.
//!
//! Implements the same unique-key upsert semantics as the real backend
//! (conflict resolves to a column-wise merge, last writer wins) so
//! migration idempotence and partial-update behavior can be tested
//! without a network.

use crate::db::{Backend, VerifiedUser};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryBackend {
    tokens: RwLock<HashMap<String, VerifiedUser>>,
    rows: RwLock<HashMap<String, Vec<Value>>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an access token that `verify_token` will accept.
    pub fn register_token(&self, token: &str, user: VerifiedUser) {
        self.tokens
            .write()
            .expect("token map poisoned")
            .insert(token.to_string(), user);
    }

    /// Make every subsequent write fail, for error-path tests.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of a table's rows, for assertions.
    pub fn table(&self, table: &str) -> Vec<Value> {
        self.rows
            .read()
            .expect("row map poisoned")
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

fn matches_filter(row: &Value, column: &str, value: &str) -> bool {
    match row.get(column) {
        Some(Value::String(s)) => s == value,
        Some(other) => other.to_string() == value,
        None => false,
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn verify_token(&self, access_token: &str) -> Result<VerifiedUser, AppError> {
        self.tokens
            .read()
            .expect("token map poisoned")
            .get(access_token)
            .cloned()
            .ok_or(AppError::InvalidToken)
    }

    async fn upsert(&self, table: &str, on_conflict: &str, row: Value) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Backend("injected write failure".to_string()));
        }

        let keys: Vec<&str> = on_conflict.split(',').map(str::trim).collect();
        let mut rows = self.rows.write().expect("row map poisoned");
        let table_rows = rows.entry(table.to_string()).or_default();

        let conflict = table_rows.iter_mut().find(|existing| {
            keys.iter()
                .all(|key| existing.get(key).is_some() && existing.get(key) == row.get(key))
        });

        match conflict {
            Some(existing) => {
                // Column-wise merge: only the columns present in the new
                // row are overwritten.
                if let (Value::Object(target), Value::Object(source)) = (existing, &row) {
                    for (column, value) in source {
                        target.insert(column.clone(), value.clone());
                    }
                }
            }
            None => table_rows.push(row),
        }

        Ok(())
    }

    async fn select(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<Value>, AppError> {
        Ok(self
            .table(table)
            .into_iter()
            .filter(|row| {
                filters
                    .iter()
                    .all(|(column, value)| matches_filter(row, column, value))
            })
            .collect())
    }
}
