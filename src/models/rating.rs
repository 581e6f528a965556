// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rating model and derived per-point statistics.

use crate::storage::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Lowest accepted star value.
pub const MIN_STARS: i32 = 1;
/// Highest accepted star value.
pub const MAX_STARS: i32 = 5;
/// Maximum comment length, in characters, after trimming.
pub const MAX_COMMENT_CHARS: usize = 500;

/// A user's rating of one collection point.
///
/// At most one rating exists per (collection point, user) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct Rating {
    pub id: String,
    pub collection_point_id: String,
    /// Author (owner) of the rating
    pub user_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    /// 1..=5
    pub stars: u8,
    /// Trimmed, 1..=500 characters
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Rating {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for a new rating. `stars` is signed so out-of-range input reaches validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingInput {
    pub collection_point_id: String,
    pub stars: i32,
    pub comment: String,
}

/// Partial update of an existing rating. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRatingInput {
    pub stars: Option<i32>,
    pub comment: Option<String>,
}

/// Star histogram. Serialized with keys `"1"`..`"5"`, all always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct RatingDistribution {
    #[serde(rename = "1")]
    pub one: u32,
    #[serde(rename = "2")]
    pub two: u32,
    #[serde(rename = "3")]
    pub three: u32,
    #[serde(rename = "4")]
    pub four: u32,
    #[serde(rename = "5")]
    pub five: u32,
}

impl RatingDistribution {
    fn bucket_mut(&mut self, stars: u8) -> Option<&mut u32> {
        match stars {
            1 => Some(&mut self.one),
            2 => Some(&mut self.two),
            3 => Some(&mut self.three),
            4 => Some(&mut self.four),
            5 => Some(&mut self.five),
            _ => None,
        }
    }

    /// Count for a star value; 0 for anything outside 1..=5.
    pub fn get(&self, stars: u8) -> u32 {
        match stars {
            1 => self.one,
            2 => self.two,
            3 => self.three,
            4 => self.four,
            5 => self.five,
            _ => 0,
        }
    }
}

/// Statistics for one collection point. Always recomputed, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct RatingStats {
    pub collection_point_id: String,
    pub average_rating: f64,
    pub total_ratings: u32,
    pub rating_distribution: RatingDistribution,
}

impl RatingStats {
    /// Aggregate a point's ratings. An empty set yields an average of 0.
    pub fn from_ratings<'a, I>(collection_point_id: &str, ratings: I) -> Self
    where
        I: IntoIterator<Item = &'a Rating>,
    {
        let mut distribution = RatingDistribution::default();
        let mut total_stars: u64 = 0;
        let mut count: u32 = 0;

        for rating in ratings {
            if let Some(bucket) = distribution.bucket_mut(rating.stars) {
                *bucket += 1;
            }
            total_stars += u64::from(rating.stars);
            count += 1;
        }

        let average_rating = if count > 0 {
            total_stars as f64 / f64::from(count)
        } else {
            0.0
        };

        Self {
            collection_point_id: collection_point_id.to_string(),
            average_rating,
            total_ratings: count,
            rating_distribution: distribution,
        }
    }
}

/// Sort key for rating queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingSortKey {
    #[default]
    Date,
    Rating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filters for rating queries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingFilters {
    pub collection_point_id: Option<String>,
    pub user_id: Option<String>,
    pub min_stars: Option<u8>,
    pub max_stars: Option<u8>,
    #[serde(default)]
    pub sort_by: RatingSortKey,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl RatingFilters {
    pub fn matches(&self, rating: &Rating) -> bool {
        self.collection_point_id
            .as_deref()
            .is_none_or(|id| rating.collection_point_id == id)
            && self.user_id.as_deref().is_none_or(|id| rating.user_id == id)
            && self.min_stars.is_none_or(|min| rating.stars >= min)
            && self.max_stars.is_none_or(|max| rating.stars <= max)
    }

    /// Order two ratings according to `sort_by` / `sort_order`.
    pub fn compare(&self, a: &Rating, b: &Rating) -> Ordering {
        let ordering = match self.sort_by {
            RatingSortKey::Date => a.created_at.cmp(&b.created_at),
            RatingSortKey::Rating => a.stars.cmp(&b.stars),
        };
        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_rating(id: &str, stars: u8) -> Rating {
        Rating {
            id: id.to_string(),
            collection_point_id: "point1".to_string(),
            user_id: format!("user_{}", id),
            user_name: "Test User".to_string(),
            user_avatar: None,
            stars,
            comment: "Bom".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_stats_empty_has_zero_average() {
        let stats = RatingStats::from_ratings("point1", std::iter::empty());
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.total_ratings, 0);
        assert_eq!(stats.rating_distribution, RatingDistribution::default());
    }

    #[test]
    fn test_stats_mean_and_histogram() {
        let ratings = vec![make_rating("a", 5), make_rating("b", 4), make_rating("c", 4)];
        let stats = RatingStats::from_ratings("point1", &ratings);

        assert_eq!(stats.total_ratings, 3);
        assert!((stats.average_rating - 13.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(stats.rating_distribution.get(4), 2);
        assert_eq!(stats.rating_distribution.get(5), 1);
        assert_eq!(stats.rating_distribution.get(1), 0);
    }

    #[test]
    fn test_distribution_serializes_all_buckets() {
        let mut distribution = RatingDistribution::default();
        distribution.five = 1;
        let json = serde_json::to_value(distribution).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"1": 0, "2": 0, "3": 0, "4": 0, "5": 1})
        );
    }

    #[test]
    fn test_rating_json_uses_camel_case() {
        let rating = make_rating("a", 3);
        let json = serde_json::to_value(&rating).unwrap();
        assert_eq!(json["collectionPointId"], "point1");
        assert!(json.get("updatedAt").is_none());
        assert!(json.get("userAvatar").is_none());
    }

    #[test]
    fn test_filters_star_bounds() {
        let filters = RatingFilters {
            min_stars: Some(2),
            max_stars: Some(4),
            ..Default::default()
        };
        assert!(!filters.matches(&make_rating("a", 1)));
        assert!(filters.matches(&make_rating("b", 3)));
        assert!(!filters.matches(&make_rating("c", 5)));
    }
}
