// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local persistence layer.
//!
//! A flat, namespaced key-value space (`kv`) with typed record collections
//! layered on top (`record`).

pub mod kv;
pub mod record;

pub use kv::{FileStore, KeyValueStore, MemoryStore, SharedStore, StorageError};
pub use record::{Record, RecordStore};

/// Storage keys. Everything lives under the `@reciclamuz:` namespace.
pub mod keys {
    pub const PREFIX: &str = "@reciclamuz:";
    pub const RATINGS: &str = "@reciclamuz:ratings";
    pub const COLLECTION_POINTS: &str = "@reciclamuz:collection_points";
    pub const AUTH_TOKEN: &str = "@reciclamuz:auth_token";
    pub const USER_DATA: &str = "@reciclamuz:user_data";
    pub const AUTH_PROVIDER: &str = "@reciclamuz:auth_provider";
    pub const SESSION_EXPIRY: &str = "@reciclamuz:session_expiry";
}
