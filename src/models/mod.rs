// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod collection_point;
pub mod rating;
pub mod user;

pub use collection_point::{
    CollectionPoint, CollectionPointFilters, CollectionPointStatistics, CollectionPointStatus,
    ContactInfo, Coordinates, CreateCollectionPointData, NewPointRating, OperatingHours,
    PointRating, UpdateCollectionPointData, WasteType, WasteTypeCount,
};
pub use rating::{
    CreateRatingInput, Rating, RatingDistribution, RatingFilters, RatingSortKey, RatingStats,
    SortOrder, UpdateRatingInput,
};
pub use user::{AuthProvider, Session, User};
