// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed record collections over a key-value backend.
//!
//! A collection is one JSON array stored under one key. Every mutation is a
//! read-modify-write of the whole array; overlapping writers on the same key
//! are not coordinated (last writer wins).
//!
//! Failures are logged and softened: reads yield empty/`None`, writes yield
//! `false`. Callers that need to tell "empty" from "broken" use `load_all`.

use crate::storage::kv::{SharedStore, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// An entity that can live in a `RecordStore`.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Unique identifier within the collection.
    fn id(&self) -> &str;
}

/// Generate a record id of the form `<prefix>_<epoch-millis>_<9 chars>`.
pub fn generate_id(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        &suffix[..9]
    )
}

/// CRUD over a homogeneous collection stored under a single key.
pub struct RecordStore<T> {
    backend: SharedStore,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new(backend: SharedStore, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    /// Storage key holding this collection.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read and decode the collection, surfacing failures.
    pub async fn load_all(&self) -> Result<Vec<T>, StorageError> {
        match self.backend.get(&self.key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_all(&self, items: &[T]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.backend.set(&self.key, raw).await
    }

    /// All records, or an empty list if absent or unreadable.
    pub async fn get_all(&self) -> Vec<T> {
        match self.load_all().await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to read collection");
                Vec::new()
            }
        }
    }

    /// Upsert by id: replace in place if present, otherwise append.
    pub async fn save(&self, item: &T) -> bool {
        let result = async {
            let mut items = self.load_all().await?;
            match items.iter().position(|existing| existing.id() == item.id()) {
                Some(index) => items[index] = item.clone(),
                None => items.push(item.clone()),
            }
            self.write_all(&items).await
        }
        .await;

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = %self.key, id = item.id(), error = %e, "Failed to save record");
                false
            }
        }
    }

    /// Replace the whole collection in a single write.
    pub async fn save_all(&self, items: &[T]) -> bool {
        match self.write_all(items).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = %self.key, count = items.len(), error = %e, "Failed to save collection");
                false
            }
        }
    }

    /// Remove the record with `id`. Removing an absent id still succeeds.
    pub async fn remove(&self, id: &str) -> bool {
        let result = async {
            let mut items = self.load_all().await?;
            items.retain(|item| item.id() != id);
            self.write_all(&items).await
        }
        .await;

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = %self.key, id, error = %e, "Failed to remove record");
                false
            }
        }
    }

    /// Delete the collection key entirely.
    pub async fn clear(&self) -> bool {
        match self.backend.remove(&self.key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to clear collection");
                false
            }
        }
    }

    pub async fn find_where<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.get_all()
            .await
            .into_iter()
            .filter(|item| predicate(item))
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<T> {
        self.get_all().await.into_iter().find(|item| item.id() == id)
    }
}
