// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use recicla_core::config::Config;
use recicla_core::models::{AuthProvider, User};
use recicla_core::routes::create_router;
use recicla_core::storage::{KeyValueStore, MemoryStore, SharedStore, StorageError};
use recicla_core::AppState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Build a user for tests.
#[allow(dead_code)]
pub fn test_user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", id),
        avatar: None,
        provider: AuthProvider::Google,
    }
}

/// Create a test app over an in-memory backend.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Arc::new(MemoryStore::new())).await
}

/// Create a test app over the given backend, with ratings loaded.
#[allow(dead_code)]
pub async fn create_test_app_with(backend: SharedStore) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), backend));
    state.ratings.load().await;
    (create_router(state.clone()), state)
}

/// Backend whose writes can be switched to fail.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_writes: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("write rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.check()?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.remove(key).await
    }

    async fn multi_set(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        self.check()?;
        self.inner.multi_set(entries).await
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.check()?;
        self.inner.multi_remove(keys).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.check()?;
        self.inner.clear().await
    }
}
