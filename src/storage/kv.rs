// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device-local key-value backends.
//!
//! Provides:
//! - `KeyValueStore`: the async get/set/remove/multi-get/multi-set contract
//! - `MemoryStore`: process-local map (tests, ephemeral runs)
//! - `FileStore`: single JSON file, rewritten on every mutation

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Errors raised by a key-value backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Shared handle to a backend, passed explicitly to every service.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Async key-value contract.
///
/// Values are opaque strings; callers decide the encoding (JSON, plain text).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Write several entries in a single batch.
    async fn multi_set(&self, entries: Vec<(String, String)>) -> Result<(), StorageError>;

    /// Remove several keys in a single batch.
    async fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError>;

    /// Remove every key in the backend.
    async fn clear(&self) -> Result<(), StorageError>;

    /// Read several keys. Missing keys come back as `None`, in request order.
    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>, StorageError> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push((key.to_string(), self.get(key).await?));
        }
        Ok(values)
    }
}

// ─── In-memory backend ───────────────────────────────────────

/// In-memory backend. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn multi_set(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.entries.insert(key, value);
        }
        Ok(())
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}

// ─── File backend ────────────────────────────────────────────

/// File-backed store: one JSON object mapping keys to values.
///
/// The whole file is rewritten (temp file + rename) on every mutation, and
/// the in-memory copy only changes once the write has succeeded.
#[derive(Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// A missing file is treated as an empty store.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(path = %path.display(), keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let body = serde_json::to_vec(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `mutate` to a copy of the map, persist it, then commit it.
    async fn mutate<F>(&self, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) + Send,
    {
        let mut guard = self.entries.lock().await;
        let mut next = guard.clone();
        mutate(&mut next);
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let key = key.to_string();
        self.mutate(move |map| {
            map.insert(key, value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.mutate(|map| {
            map.remove(key);
        })
        .await
    }

    async fn multi_set(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        self.mutate(move |map| map.extend(entries)).await
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.mutate(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
        .await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.mutate(|map| map.clear()).await
    }
}
