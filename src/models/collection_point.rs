// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection point model with its embedded rating summary.

use crate::storage::Record;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Round to two decimal places (`round(x * 100) / 100`).
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Kind of waste a point accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub enum WasteType {
    Plastic,
    Paper,
    Glass,
    Metal,
    Organic,
}

impl WasteType {
    pub const ALL: [WasteType; 5] = [
        WasteType::Plastic,
        WasteType::Paper,
        WasteType::Glass,
        WasteType::Metal,
        WasteType::Organic,
    ];

    /// Portuguese display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            WasteType::Plastic => "Plástico",
            WasteType::Paper => "Papel",
            WasteType::Glass => "Vidro",
            WasteType::Metal => "Metal",
            WasteType::Organic => "Orgânico",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub enum CollectionPointStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

impl CollectionPointStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            CollectionPointStatus::Active => "Ativo",
            CollectionPointStatus::Inactive => "Inativo",
            CollectionPointStatus::Maintenance => "Manutenção",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Coordinates {
    /// Great-circle distance to `other`, in kilometres.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        use geo::{Distance, Haversine, Point};

        let from = Point::new(self.longitude, self.latitude);
        let to = Point::new(other.longitude, other.latitude);
        Haversine.distance(from, to) / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct OperatingHours {
    /// 0 = Sunday
    #[validate(range(max = 6))]
    pub day_of_week: u8,
    /// "HH:MM"
    pub open_time: String,
    pub close_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_person: Option<String>,
}

/// Rating embedded in a collection point (one per user, replaced on re-rate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct PointRating {
    pub user_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// ISO 8601
    pub date: String,
}

/// Embedded rating input; the repository stamps `date`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPointRating {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

/// Mean of embedded ratings rounded to two decimals; 0 for none.
pub fn average_point_rating(ratings: &[PointRating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = ratings.iter().map(|r| f64::from(r.rating)).sum();
    round_to_cents(sum / ratings.len() as f64)
}

/// Stored collection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct CollectionPoint {
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub waste_types: Vec<WasteType>,
    pub status: CollectionPointStatus,
    #[serde(default)]
    pub operating_hours: Vec<OperatingHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    pub created_at: String,
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub ratings: Vec<PointRating>,
    /// Mean of `ratings[].rating`, two decimals
    #[serde(default)]
    pub average_rating: f64,
}

impl Record for CollectionPoint {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionPointData {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(nested)]
    pub coordinates: Coordinates,
    #[validate(length(min = 1))]
    pub waste_types: Vec<WasteType>,
    #[serde(default)]
    #[validate(nested)]
    pub operating_hours: Option<Vec<OperatingHours>>,
    #[serde(default)]
    #[validate(nested)]
    pub contact_info: Option<ContactInfo>,
    #[serde(default)]
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Partial update; present fields overwrite stored ones.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionPointData {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub address: Option<String>,
    #[validate(nested)]
    pub coordinates: Option<Coordinates>,
    pub waste_types: Option<Vec<WasteType>>,
    pub status: Option<CollectionPointStatus>,
    #[validate(nested)]
    pub operating_hours: Option<Vec<OperatingHours>>,
    #[validate(nested)]
    pub contact_info: Option<ContactInfo>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(nested)]
    pub ratings: Option<Vec<PointRating>>,
}

impl UpdateCollectionPointData {
    /// Merge present fields into `point`.
    pub fn apply_to(self, point: &mut CollectionPoint) {
        if let Some(name) = self.name {
            point.name = name;
        }
        if let Some(description) = self.description {
            point.description = description;
        }
        if let Some(address) = self.address {
            point.address = address;
        }
        if let Some(coordinates) = self.coordinates {
            point.coordinates = coordinates;
        }
        if let Some(waste_types) = self.waste_types {
            point.waste_types = waste_types;
        }
        if let Some(status) = self.status {
            point.status = status;
        }
        if let Some(operating_hours) = self.operating_hours {
            point.operating_hours = operating_hours;
        }
        if self.contact_info.is_some() {
            point.contact_info = self.contact_info;
        }
        if self.image_url.is_some() {
            point.image_url = self.image_url;
        }
        if let Some(ratings) = self.ratings {
            point.ratings = ratings;
        }
    }
}

/// Point search filters. Unset fields do not constrain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPointFilters {
    /// Matches points accepting any of these types
    pub waste_types: Option<Vec<WasteType>>,
    /// Matches points in any of these statuses
    pub status: Option<Vec<CollectionPointStatus>>,
    pub min_rating: Option<f64>,
    /// Requires `user_location`
    pub max_distance_km: Option<f64>,
    pub user_location: Option<Coordinates>,
}

impl CollectionPointFilters {
    pub fn matches(&self, point: &CollectionPoint) -> bool {
        if let Some(types) = &self.waste_types {
            if !types.iter().any(|t| point.waste_types.contains(t)) {
                return false;
            }
        }
        if let Some(statuses) = &self.status {
            if !statuses.contains(&point.status) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if point.average_rating < min {
                return false;
            }
        }
        if let (Some(max_km), Some(origin)) = (self.max_distance_km, &self.user_location) {
            if origin.distance_km(&point.coordinates) > max_km {
                return false;
            }
        }
        true
    }
}

/// Per-type point count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct WasteTypeCount {
    #[serde(rename = "type")]
    pub waste_type: WasteType,
    pub count: u32,
}

/// Repository-wide aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct CollectionPointStatistics {
    pub total_points: u32,
    pub active_points: u32,
    pub waste_type_stats: Vec<WasteTypeCount>,
    /// Mean of per-point averages, two decimals
    pub average_rating: f64,
}

impl CollectionPointStatistics {
    pub fn from_points(points: &[CollectionPoint]) -> Self {
        let active_points = points
            .iter()
            .filter(|p| p.status == CollectionPointStatus::Active)
            .count() as u32;

        let waste_type_stats = WasteType::ALL
            .iter()
            .map(|waste_type| WasteTypeCount {
                waste_type: *waste_type,
                count: points
                    .iter()
                    .filter(|p| p.waste_types.contains(waste_type))
                    .count() as u32,
            })
            .collect();

        let average_rating = if points.is_empty() {
            0.0
        } else {
            points.iter().map(|p| p.average_rating).sum::<f64>() / points.len() as f64
        };

        Self {
            total_points: points.len() as u32,
            active_points,
            waste_type_stats,
            average_rating: round_to_cents(average_rating),
        }
    }
}
