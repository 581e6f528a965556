// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rating API routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateRatingInput, Rating, RatingFilters, RatingStats, UpdateRatingInput};
use crate::services::rating::messages;
use crate::AppState;

/// Read-only routes, available without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ratings", get(find_ratings))
        .route("/api/points/{id}/ratings", get(point_ratings))
        .route("/api/points/{id}/rating-stats", get(point_rating_stats))
}

/// Routes acting as the signed-in user. Layered with `require_session`.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me/ratings", get(my_ratings).post(create_rating))
        .route(
            "/api/me/ratings/{id}",
            patch(update_rating).delete(delete_rating),
        )
        .route("/api/me/points/{id}/rating", get(my_rating_for_point))
}

#[derive(Serialize)]
pub struct RatingsResponse {
    pub ratings: Vec<Rating>,
}

// ─── Public queries ──────────────────────────────────────────────

async fn find_ratings(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<RatingFilters>,
) -> Result<Json<RatingsResponse>> {
    if let (Some(min), Some(max)) = (filters.min_stars, filters.max_stars) {
        if min > max {
            return Err(AppError::BadRequest(
                "minStars must not exceed maxStars".to_string(),
            ));
        }
    }

    let ratings = state.ratings.find_ratings(&filters).await;
    Ok(Json(RatingsResponse { ratings }))
}

async fn point_ratings(
    State(state): State<Arc<AppState>>,
    Path(point_id): Path<String>,
) -> Json<RatingsResponse> {
    let ratings = state.ratings.ratings_by_collection_point(&point_id).await;
    Json(RatingsResponse { ratings })
}

async fn point_rating_stats(
    State(state): State<Arc<AppState>>,
    Path(point_id): Path<String>,
) -> Json<RatingStats> {
    Json(state.ratings.stats_for_collection_point(&point_id).await)
}

// ─── Signed-in user ──────────────────────────────────────────────

async fn my_ratings(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Json<RatingsResponse> {
    let ratings = state.ratings.ratings_by_user(&user.id).await;
    Json(RatingsResponse { ratings })
}

async fn my_rating_for_point(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(point_id): Path<String>,
) -> Result<Json<Rating>> {
    state
        .ratings
        .user_rating_for_point(Some(&user), &point_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(messages::NOT_FOUND.to_string()))
}

async fn create_rating(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(input): Json<CreateRatingInput>,
) -> Result<(StatusCode, Json<Rating>)> {
    let rating = state.ratings.create_rating(Some(&user), input).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

async fn update_rating(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(rating_id): Path<String>,
    Json(input): Json<UpdateRatingInput>,
) -> Result<Json<Rating>> {
    let rating = state
        .ratings
        .update_rating(Some(&user), &rating_id, input)
        .await?;
    Ok(Json(rating))
}

async fn delete_rating(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(rating_id): Path<String>,
) -> Result<StatusCode> {
    state.ratings.delete_rating(Some(&user), &rating_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
