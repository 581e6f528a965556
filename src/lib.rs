// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ReciclaMuz core: collection points, ratings and the local session.
//!
//! This crate provides the persistence and rating-aggregation layer behind
//! the collection-point app, plus a small local JSON API for view layers.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod time_utils;

use config::Config;
use services::{CollectionPointRepository, RatingService, SessionStore};
use storage::{keys, RecordStore, SharedStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub ratings: RatingService,
    pub collection_points: CollectionPointRepository,
}

impl AppState {
    /// Wire every service onto one backend. Ratings are not loaded yet;
    /// call `ratings.load()` before serving.
    pub fn new(config: Config, backend: SharedStore) -> Self {
        let sessions = SessionStore::new(backend.clone(), config.session_ttl());
        let ratings = RatingService::new(RecordStore::new(backend.clone(), keys::RATINGS));
        let collection_points =
            CollectionPointRepository::new(RecordStore::new(backend, keys::COLLECTION_POINTS));

        Self {
            config,
            sessions,
            ratings,
            collection_points,
        }
    }
}
