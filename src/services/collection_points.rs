// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection point repository.
//!
//! CRUD over the `collection_points` collection plus the embedded rating
//! list. Each point keeps `average_rating` equal to the two-decimal mean of
//! its embedded ratings; it is recomputed whenever the ratings change.
//!
//! Failures are logged and reported as `None` / `false`.

use crate::models::collection_point::average_point_rating;
use crate::models::{
    CollectionPoint, CollectionPointFilters, CollectionPointStatistics, CollectionPointStatus,
    CreateCollectionPointData, NewPointRating, PointRating, UpdateCollectionPointData, WasteType,
};
use crate::storage::record::{generate_id, RecordStore};
use crate::time_utils::now_rfc3339;

const ID_PREFIX: &str = "cp";

#[derive(Clone)]
pub struct CollectionPointRepository {
    store: RecordStore<CollectionPoint>,
}

impl CollectionPointRepository {
    pub fn new(store: RecordStore<CollectionPoint>) -> Self {
        Self { store }
    }

    /// Create an active point with no ratings.
    pub async fn create_collection_point(
        &self,
        data: CreateCollectionPointData,
    ) -> Option<CollectionPoint> {
        let now = now_rfc3339();
        let point = CollectionPoint {
            id: generate_id(ID_PREFIX),
            name: data.name,
            description: data.description,
            address: data.address,
            coordinates: data.coordinates,
            waste_types: data.waste_types,
            status: CollectionPointStatus::Active,
            operating_hours: data.operating_hours.unwrap_or_default(),
            contact_info: data.contact_info,
            created_at: now.clone(),
            last_updated: now,
            image_url: data.image_url,
            ratings: Vec::new(),
            average_rating: 0.0,
        };

        if !self.store.save(&point).await {
            return None;
        }
        tracing::info!(point_id = %point.id, name = %point.name, "Collection point created");
        Some(point)
    }

    /// Merge `data` into an existing point. `None` if the id is unknown.
    pub async fn update_collection_point(
        &self,
        id: &str,
        data: UpdateCollectionPointData,
    ) -> Option<CollectionPoint> {
        let mut point = self.store.find_where(|p| p.id == id).await.into_iter().next()?;

        data.apply_to(&mut point);
        point.last_updated = now_rfc3339();
        if !point.ratings.is_empty() {
            point.average_rating = average_point_rating(&point.ratings);
        }

        if !self.store.save(&point).await {
            return None;
        }
        tracing::info!(point_id = %point.id, "Collection point updated");
        Some(point)
    }

    pub async fn get(&self, id: &str) -> Option<CollectionPoint> {
        self.store.get_by_id(id).await
    }

    pub async fn list(&self) -> Vec<CollectionPoint> {
        self.store.get_all().await
    }

    pub async fn delete(&self, id: &str) -> bool {
        let removed = self.store.remove(id).await;
        if removed {
            tracing::info!(point_id = id, "Collection point deleted");
        }
        removed
    }

    pub async fn find_by_waste_type(&self, waste_type: WasteType) -> Vec<CollectionPoint> {
        self.store
            .find_where(|p| p.waste_types.contains(&waste_type))
            .await
    }

    pub async fn find_active(&self) -> Vec<CollectionPoint> {
        self.store
            .find_where(|p| p.status == CollectionPointStatus::Active)
            .await
    }

    pub async fn find_filtered(&self, filters: &CollectionPointFilters) -> Vec<CollectionPoint> {
        self.store.find_where(|p| filters.matches(p)).await
    }

    /// Add (or replace) `rating.user_id`'s embedded rating on a point.
    pub async fn add_rating(&self, point_id: &str, rating: NewPointRating) -> bool {
        let Some(mut point) = self.store.get_by_id(point_id).await else {
            tracing::warn!(point_id, "Cannot rate unknown collection point");
            return false;
        };

        let now = now_rfc3339();
        point.ratings.retain(|r| r.user_id != rating.user_id);
        point.ratings.push(PointRating {
            user_id: rating.user_id,
            rating: rating.rating,
            comment: rating.comment,
            date: now.clone(),
        });
        point.average_rating = average_point_rating(&point.ratings);
        point.last_updated = now;

        let saved = self.store.save(&point).await;
        if saved {
            tracing::info!(
                point_id,
                ratings = point.ratings.len(),
                average = point.average_rating,
                "Embedded rating recorded"
            );
        }
        saved
    }

    pub async fn update_status(&self, point_id: &str, status: CollectionPointStatus) -> bool {
        let Some(mut point) = self.store.get_by_id(point_id).await else {
            return false;
        };

        point.status = status;
        point.last_updated = now_rfc3339();
        self.store.save(&point).await
    }

    pub async fn get_statistics(&self) -> CollectionPointStatistics {
        CollectionPointStatistics::from_points(&self.store.get_all().await)
    }
}
