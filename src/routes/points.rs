// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection point routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    CollectionPoint, CollectionPointFilters, CollectionPointStatistics, CollectionPointStatus,
    CreateCollectionPointData, NewPointRating, UpdateCollectionPointData, WasteType,
};
use crate::AppState;

const POINT_NOT_FOUND: &str = "Ponto de coleta não encontrado";
const POINT_SAVE_FAILED: &str = "Falha ao salvar ponto de coleta";

/// Read-only routes, available without a session.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/points", get(list_points))
        .route("/api/points/search", post(search_points))
        .route("/api/points/statistics", get(statistics))
        .route("/api/points/{id}", get(get_point))
}

/// Mutations. Layered with `require_session`; the GET handlers on the
/// same paths stay public.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/points", post(create_point))
        .route(
            "/api/points/{id}",
            patch(update_point).delete(delete_point),
        )
        .route("/api/points/{id}/status", put(update_status))
        .route("/api/me/points/{id}/embedded-rating", post(add_embedded_rating))
}

/// Query parameters for `GET /api/points`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPointsQuery {
    pub waste_type: Option<WasteType>,
    /// `true` restricts to active points
    pub active: Option<bool>,
}

#[derive(Serialize)]
pub struct PointsResponse {
    pub points: Vec<CollectionPoint>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: CollectionPointStatus,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedRatingRequest {
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

fn not_found() -> AppError {
    AppError::NotFound(POINT_NOT_FOUND.to_string())
}

// ─── Queries ─────────────────────────────────────────────────────

async fn list_points(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPointsQuery>,
) -> Json<PointsResponse> {
    let repo = &state.collection_points;
    let points = match (query.waste_type, query.active) {
        (Some(waste_type), Some(true)) => repo
            .find_by_waste_type(waste_type)
            .await
            .into_iter()
            .filter(|p| p.status == CollectionPointStatus::Active)
            .collect(),
        (Some(waste_type), _) => repo.find_by_waste_type(waste_type).await,
        (None, Some(true)) => repo.find_active().await,
        (None, _) => repo.list().await,
    };
    Json(PointsResponse { points })
}

async fn search_points(
    State(state): State<Arc<AppState>>,
    Json(filters): Json<CollectionPointFilters>,
) -> Result<Json<PointsResponse>> {
    if filters.max_distance_km.is_some() && filters.user_location.is_none() {
        return Err(AppError::BadRequest(
            "maxDistanceKm requires userLocation".to_string(),
        ));
    }
    if let Some(location) = &filters.user_location {
        location.validate()?;
    }

    let points = state.collection_points.find_filtered(&filters).await;
    Ok(Json(PointsResponse { points }))
}

async fn statistics(State(state): State<Arc<AppState>>) -> Json<CollectionPointStatistics> {
    Json(state.collection_points.get_statistics().await)
}

async fn get_point(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CollectionPoint>> {
    state
        .collection_points
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(not_found)
}

// ─── Mutations ───────────────────────────────────────────────────

async fn create_point(
    State(state): State<Arc<AppState>>,
    Json(data): Json<CreateCollectionPointData>,
) -> Result<(StatusCode, Json<CollectionPoint>)> {
    data.validate()?;

    let point = state
        .collection_points
        .create_collection_point(data)
        .await
        .ok_or_else(|| AppError::Storage(POINT_SAVE_FAILED.to_string()))?;
    Ok((StatusCode::CREATED, Json(point)))
}

async fn update_point(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(data): Json<UpdateCollectionPointData>,
) -> Result<Json<CollectionPoint>> {
    data.validate()?;

    // Distinguish unknown ids from write failures
    if state.collection_points.get(&id).await.is_none() {
        return Err(not_found());
    }

    state
        .collection_points
        .update_collection_point(&id, data)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Storage(POINT_SAVE_FAILED.to_string()))
}

async fn delete_point(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.collection_points.get(&id).await.is_none() {
        return Err(not_found());
    }
    if !state.collection_points.delete(&id).await {
        return Err(AppError::Storage(POINT_SAVE_FAILED.to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<CollectionPoint>> {
    if !state.collection_points.update_status(&id, body.status).await {
        return Err(not_found());
    }
    state
        .collection_points
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(not_found)
}

async fn add_embedded_rating(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<EmbeddedRatingRequest>,
) -> Result<Json<CollectionPoint>> {
    let rating = NewPointRating {
        user_id: user.id,
        rating: body.rating,
        comment: body.comment,
    };
    rating.validate()?;

    if state.collection_points.get(&id).await.is_none() {
        return Err(not_found());
    }
    if !state.collection_points.add_rating(&id, rating).await {
        return Err(AppError::Storage(POINT_SAVE_FAILED.to_string()));
    }

    state
        .collection_points
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(not_found)
}
