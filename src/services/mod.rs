// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod collection_points;
pub mod rating;
pub mod session;

pub use collection_points::CollectionPointRepository;
pub use rating::RatingService;
pub use session::SessionStore;
