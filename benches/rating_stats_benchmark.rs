use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use recicla_core::models::{
    CollectionPoint, CollectionPointFilters, CollectionPointStatistics, CollectionPointStatus,
    Coordinates, Rating, RatingFilters, RatingSortKey, RatingStats, SortOrder, WasteType,
};
use std::hint::black_box;

fn make_ratings(count: usize) -> Vec<Rating> {
    (0..count)
        .map(|i| Rating {
            id: format!("rating_{}", i),
            collection_point_id: format!("cp_{}", i % 50),
            user_id: format!("user_{}", i),
            user_name: "Usuário".to_string(),
            user_avatar: None,
            stars: (i % 5 + 1) as u8,
            comment: "Ponto limpo e bem sinalizado".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        })
        .collect()
}

fn make_points(count: usize) -> Vec<CollectionPoint> {
    (0..count)
        .map(|i| CollectionPoint {
            id: format!("cp_{}", i),
            name: format!("Ecoponto {}", i),
            description: String::new(),
            address: "Muzambinho".to_string(),
            coordinates: Coordinates {
                latitude: -21.37 + (i as f64) * 0.001,
                longitude: -46.52,
            },
            waste_types: vec![WasteType::ALL[i % WasteType::ALL.len()]],
            status: if i % 7 == 0 {
                CollectionPointStatus::Inactive
            } else {
                CollectionPointStatus::Active
            },
            operating_hours: Vec::new(),
            contact_info: None,
            created_at: "2025-11-07T10:00:00.000Z".to_string(),
            last_updated: "2025-11-07T10:00:00.000Z".to_string(),
            image_url: None,
            ratings: Vec::new(),
            average_rating: (i % 5) as f64,
        })
        .collect()
}

fn benchmark_rating_aggregation(c: &mut Criterion) {
    let ratings = make_ratings(10_000);
    let filters = RatingFilters {
        min_stars: Some(3),
        sort_by: RatingSortKey::Rating,
        sort_order: SortOrder::Desc,
        ..Default::default()
    };

    let mut group = c.benchmark_group("rating_aggregation");

    group.bench_function("stats_for_one_point", |b| {
        b.iter(|| {
            RatingStats::from_ratings(
                "cp_7",
                black_box(&ratings)
                    .iter()
                    .filter(|r| r.collection_point_id == "cp_7"),
            )
        })
    });

    group.bench_function("filter_and_sort", |b| {
        b.iter(|| {
            let mut found: Vec<&Rating> = black_box(&ratings)
                .iter()
                .filter(|r| filters.matches(r))
                .collect();
            found.sort_by(|a, b| filters.compare(a, b));
            found.len()
        })
    });

    group.finish();
}

fn benchmark_point_queries(c: &mut Criterion) {
    let points = make_points(2_000);
    let nearby = CollectionPointFilters {
        max_distance_km: Some(5.0),
        user_location: Some(Coordinates {
            latitude: -21.37,
            longitude: -46.52,
        }),
        ..Default::default()
    };

    let mut group = c.benchmark_group("point_queries");

    group.bench_function("statistics", |b| {
        b.iter(|| CollectionPointStatistics::from_points(black_box(&points)))
    });

    group.bench_function("distance_filter", |b| {
        b.iter(|| {
            black_box(&points)
                .iter()
                .filter(|p| nearby.matches(p))
                .count()
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_rating_aggregation, benchmark_point_queries);
criterion_main!(benches);
