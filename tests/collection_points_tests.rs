// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

mod common;

use common::FlakyStore;
use recicla_core::models::{
    CollectionPointFilters, CollectionPointStatus, Coordinates, CreateCollectionPointData,
    NewPointRating, PointRating, UpdateCollectionPointData, WasteType,
};
use recicla_core::services::CollectionPointRepository;
use recicla_core::storage::{keys, MemoryStore, RecordStore, SharedStore};
use std::sync::Arc;

fn repo_on(backend: SharedStore) -> CollectionPointRepository {
    CollectionPointRepository::new(RecordStore::new(backend, keys::COLLECTION_POINTS))
}

fn new_repo() -> CollectionPointRepository {
    repo_on(Arc::new(MemoryStore::new()))
}

fn point_data(name: &str, waste_types: Vec<WasteType>, latitude: f64) -> CreateCollectionPointData {
    CreateCollectionPointData {
        name: name.to_string(),
        description: "Ponto de entrega voluntária".to_string(),
        address: "Praça Central, Muzambinho".to_string(),
        coordinates: Coordinates {
            latitude,
            longitude: -46.5258,
        },
        waste_types,
        operating_hours: None,
        contact_info: None,
        image_url: None,
    }
}

fn embedded(user: &str, rating: u8) -> NewPointRating {
    NewPointRating {
        user_id: user.to_string(),
        rating,
        comment: None,
    }
}

#[tokio::test]
async fn test_create_and_get() {
    let repo = new_repo();
    let point = repo
        .create_collection_point(point_data("Ecoponto", vec![WasteType::Glass], -21.37))
        .await
        .expect("create should succeed");

    assert!(point.id.starts_with("cp_"));
    assert_eq!(point.status, CollectionPointStatus::Active);
    assert!(point.ratings.is_empty());
    assert_eq!(point.average_rating, 0.0);
    assert!(point.operating_hours.is_empty());
    assert_eq!(point.created_at, point.last_updated);

    assert_eq!(repo.get(&point.id).await, Some(point.clone()));
    assert_eq!(repo.list().await, vec![point]);
    assert_eq!(repo.get("cp_missing").await, None);
}

#[tokio::test]
async fn test_add_rating_replaces_previous_from_same_user() {
    let repo = new_repo();
    let point = repo
        .create_collection_point(point_data("Ecoponto", vec![WasteType::Metal], -21.37))
        .await
        .unwrap();

    assert!(repo.add_rating(&point.id, embedded("u1", 5)).await);
    assert!(repo.add_rating(&point.id, embedded("u2", 4)).await);
    assert!(repo.add_rating(&point.id, embedded("u1", 2)).await);

    let stored = repo.get(&point.id).await.unwrap();
    assert_eq!(stored.ratings.len(), 2);
    let u1: Vec<&PointRating> = stored.ratings.iter().filter(|r| r.user_id == "u1").collect();
    assert_eq!(u1.len(), 1);
    assert_eq!(u1[0].rating, 2);
    assert_eq!(stored.average_rating, 3.0);

    assert!(repo.add_rating(&point.id, embedded("u3", 5)).await);
    let stored = repo.get(&point.id).await.unwrap();
    assert_eq!(stored.average_rating, 3.67);

    assert!(!repo.add_rating("cp_missing", embedded("u1", 5)).await);
}

#[tokio::test]
async fn test_update_merges_and_recomputes_average() {
    let repo = new_repo();
    let point = repo
        .create_collection_point(point_data("Ecoponto", vec![WasteType::Paper], -21.37))
        .await
        .unwrap();

    let updated = repo
        .update_collection_point(
            &point.id,
            UpdateCollectionPointData {
                name: Some("Ecoponto Centro".to_string()),
                ratings: Some(vec![
                    PointRating {
                        user_id: "u1".to_string(),
                        rating: 5,
                        comment: None,
                        date: "2025-11-07T10:00:00.000Z".to_string(),
                    },
                    PointRating {
                        user_id: "u2".to_string(),
                        rating: 4,
                        comment: Some("Limpo".to_string()),
                        date: "2025-11-08T10:00:00.000Z".to_string(),
                    },
                ]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Ecoponto Centro");
    assert_eq!(updated.address, point.address);
    assert_eq!(updated.average_rating, 4.5);
    assert_eq!(updated.created_at, point.created_at);

    assert!(repo
        .update_collection_point("cp_missing", UpdateCollectionPointData::default())
        .await
        .is_none());
}

#[tokio::test]
async fn test_status_and_delete() {
    let repo = new_repo();
    let point = repo
        .create_collection_point(point_data("Ecoponto", vec![WasteType::Organic], -21.37))
        .await
        .unwrap();

    assert!(
        repo.update_status(&point.id, CollectionPointStatus::Maintenance)
            .await
    );
    assert_eq!(
        repo.get(&point.id).await.unwrap().status,
        CollectionPointStatus::Maintenance
    );
    assert!(repo.find_active().await.is_empty());
    assert!(
        !repo
            .update_status("cp_missing", CollectionPointStatus::Active)
            .await
    );

    assert!(repo.delete(&point.id).await);
    assert!(repo.list().await.is_empty());
    // Deleting an absent id still succeeds
    assert!(repo.delete(&point.id).await);
}

#[tokio::test]
async fn test_queries_and_filters() {
    let repo = new_repo();
    let centre = repo
        .create_collection_point(point_data(
            "Centro",
            vec![WasteType::Plastic, WasteType::Glass],
            -21.3729,
        ))
        .await
        .unwrap();
    let far = repo
        .create_collection_point(point_data("Distante", vec![WasteType::Glass], -21.2729))
        .await
        .unwrap();
    repo.add_rating(&centre.id, embedded("u1", 5)).await;
    repo.update_status(&far.id, CollectionPointStatus::Inactive)
        .await;

    let plastic = repo.find_by_waste_type(WasteType::Plastic).await;
    assert_eq!(plastic.len(), 1);
    assert_eq!(plastic[0].id, centre.id);
    assert_eq!(repo.find_by_waste_type(WasteType::Glass).await.len(), 2);

    let active = repo.find_active().await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, centre.id);

    // ~11 km apart
    let nearby = repo
        .find_filtered(&CollectionPointFilters {
            max_distance_km: Some(5.0),
            user_location: Some(Coordinates {
                latitude: -21.3729,
                longitude: -46.5258,
            }),
            ..Default::default()
        })
        .await;
    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0].id, centre.id);

    let rated = repo
        .find_filtered(&CollectionPointFilters {
            min_rating: Some(4.0),
            ..Default::default()
        })
        .await;
    assert_eq!(rated.len(), 1);

    let inactive = repo
        .find_filtered(&CollectionPointFilters {
            status: Some(vec![CollectionPointStatus::Inactive]),
            waste_types: Some(vec![WasteType::Glass]),
            ..Default::default()
        })
        .await;
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].id, far.id);
}

#[tokio::test]
async fn test_statistics() {
    let repo = new_repo();
    let empty = repo.get_statistics().await;
    assert_eq!(empty.total_points, 0);
    assert_eq!(empty.active_points, 0);
    assert_eq!(empty.average_rating, 0.0);
    assert!(empty.waste_type_stats.iter().all(|s| s.count == 0));

    let a = repo
        .create_collection_point(point_data("A", vec![WasteType::Plastic], -21.37))
        .await
        .unwrap();
    let b = repo
        .create_collection_point(point_data(
            "B",
            vec![WasteType::Plastic, WasteType::Metal],
            -21.38,
        ))
        .await
        .unwrap();
    repo.add_rating(&a.id, embedded("u1", 5)).await;
    repo.add_rating(&b.id, embedded("u1", 4)).await;
    repo.update_status(&b.id, CollectionPointStatus::Inactive)
        .await;

    let stats = repo.get_statistics().await;
    assert_eq!(stats.total_points, 2);
    assert_eq!(stats.active_points, 1);
    assert_eq!(stats.average_rating, 4.5);
    let count = |t: WasteType| {
        stats
            .waste_type_stats
            .iter()
            .find(|s| s.waste_type == t)
            .map(|s| s.count)
    };
    assert_eq!(count(WasteType::Plastic), Some(2));
    assert_eq!(count(WasteType::Metal), Some(1));
    assert_eq!(count(WasteType::Paper), Some(0));
}

#[tokio::test]
async fn test_write_failure_reports_false() {
    let flaky = FlakyStore::new();
    let repo = repo_on(Arc::new(flaky.clone()));
    let point = repo
        .create_collection_point(point_data("A", vec![WasteType::Paper], -21.37))
        .await
        .unwrap();

    flaky.set_fail_writes(true);
    assert!(repo
        .create_collection_point(point_data("B", vec![WasteType::Paper], -21.37))
        .await
        .is_none());
    assert!(!repo.add_rating(&point.id, embedded("u1", 5)).await);
    assert!(!repo.delete(&point.id).await);

    assert_eq!(repo.list().await, vec![point]);
}
