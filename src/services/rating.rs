// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rating aggregation service.
//!
//! Owns the rating invariants:
//! - one rating per (collection point, user)
//! - 1..=5 stars, trimmed comment of 1..=500 characters
//! - only the author may edit or delete
//!
//! The full collection is held in memory and mirrored to a single storage
//! key. Mutations are persisted first and only then applied in memory, so a
//! failed write leaves the in-memory view untouched.

use crate::error::{AppError, Result};
use crate::models::rating::{MAX_COMMENT_CHARS, MAX_STARS, MIN_STARS};
use crate::models::{
    CreateRatingInput, Rating, RatingFilters, RatingStats, UpdateRatingInput, User,
};
use crate::storage::record::{generate_id, RecordStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// User-facing messages.
pub mod messages {
    pub const INVALID_STARS: &str = "Avaliação deve estar entre 1 e 5 estrelas";
    pub const COMMENT_REQUIRED: &str = "Comentário é obrigatório";
    pub const COMMENT_TOO_LONG: &str = "O comentário deve ter no máximo 500 caracteres";
    pub const ALREADY_RATED: &str = "Você já avaliou este ponto. Use a opção de editar.";
    pub const NOT_FOUND: &str = "Avaliação não encontrada";
    pub const CANNOT_EDIT: &str = "Você não pode editar avaliações de outros usuários";
    pub const CANNOT_DELETE: &str = "Você não pode deletar avaliações de outros usuários";
    pub const SAVE_FAILED: &str = "Falha ao salvar avaliação";
    pub const LOAD_FAILED: &str = "Falha ao carregar avaliações";
    pub const ANONYMOUS_USER: &str = "Usuário Anônimo";
}

const ID_PREFIX: &str = "rating";

#[derive(Default)]
struct RatingState {
    ratings: Vec<Rating>,
    load_error: Option<String>,
}

/// Rating CRUD, queries and statistics.
#[derive(Clone)]
pub struct RatingService {
    store: RecordStore<Rating>,
    state: Arc<RwLock<RatingState>>,
}

fn validate_stars(stars: i32) -> Result<u8> {
    if !(MIN_STARS..=MAX_STARS).contains(&stars) {
        return Err(AppError::Validation(messages::INVALID_STARS.to_string()));
    }
    Ok(stars as u8)
}

/// Trim and bound-check a comment, returning the value to store.
fn validate_comment(comment: &str) -> Result<String> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(messages::COMMENT_REQUIRED.to_string()));
    }
    if trimmed.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::Validation(messages::COMMENT_TOO_LONG.to_string()));
    }
    Ok(trimmed.to_string())
}

fn newest_first(ratings: &mut [Rating]) {
    ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

impl RatingService {
    /// Create a service over `store`. Call `load` before serving queries.
    pub fn new(store: RecordStore<Rating>) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(RatingState::default())),
        }
    }

    /// Load (or reload) the collection from storage into memory.
    ///
    /// On failure the in-memory view is kept and the error is recorded
    /// for `last_load_error`. Mutations are refused until a load succeeds.
    pub async fn load(&self) {
        let mut state = self.state.write().await;
        match self.store.load_all().await {
            Ok(ratings) => {
                tracing::info!(count = ratings.len(), "Ratings loaded");
                state.ratings = ratings;
                state.load_error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load ratings");
                state.load_error = Some(messages::LOAD_FAILED.to_string());
            }
        }
    }

    /// Message from the most recent failed load, if any.
    pub async fn last_load_error(&self) -> Option<String> {
        self.state.read().await.load_error.clone()
    }

    /// Snapshot of every rating, in storage order.
    pub async fn ratings(&self) -> Vec<Rating> {
        self.state.read().await.ratings.clone()
    }

    /// Write `next` to storage and, only if that succeeds, adopt it in memory.
    ///
    /// Refused while the stored collection is unreadable.
    async fn commit(&self, state: &mut RatingState, next: Vec<Rating>) -> Result<()> {
        if state.load_error.is_some() {
            tracing::warn!("Refusing to write ratings over an unreadable collection");
            return Err(AppError::Storage(messages::LOAD_FAILED.to_string()));
        }
        if !self.store.save_all(&next).await {
            return Err(AppError::Storage(messages::SAVE_FAILED.to_string()));
        }
        state.ratings = next;
        Ok(())
    }

    pub async fn create_rating(
        &self,
        user: Option<&User>,
        input: CreateRatingInput,
    ) -> Result<Rating> {
        let user = user.ok_or(AppError::Unauthenticated)?;
        let stars = validate_stars(input.stars)?;
        let comment = validate_comment(&input.comment)?;

        let mut state = self.state.write().await;

        let already_rated = state
            .ratings
            .iter()
            .any(|r| r.collection_point_id == input.collection_point_id && r.user_id == user.id);
        if already_rated {
            return Err(AppError::Conflict(messages::ALREADY_RATED.to_string()));
        }

        let user_name = if user.name.trim().is_empty() {
            messages::ANONYMOUS_USER.to_string()
        } else {
            user.name.clone()
        };

        let rating = Rating {
            id: generate_id(ID_PREFIX),
            collection_point_id: input.collection_point_id,
            user_id: user.id.clone(),
            user_name,
            user_avatar: user.avatar.clone(),
            stars,
            comment,
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        let mut next = state.ratings.clone();
        next.push(rating.clone());
        self.commit(&mut state, next).await?;

        tracing::info!(
            rating_id = %rating.id,
            point_id = %rating.collection_point_id,
            user_id = %rating.user_id,
            stars = rating.stars,
            "Rating created"
        );
        Ok(rating)
    }

    pub async fn update_rating(
        &self,
        user: Option<&User>,
        rating_id: &str,
        input: UpdateRatingInput,
    ) -> Result<Rating> {
        let user = user.ok_or(AppError::Unauthenticated)?;
        let mut state = self.state.write().await;

        let index = state
            .ratings
            .iter()
            .position(|r| r.id == rating_id)
            .ok_or_else(|| AppError::NotFound(messages::NOT_FOUND.to_string()))?;

        if state.ratings[index].user_id != user.id {
            return Err(AppError::Forbidden(messages::CANNOT_EDIT.to_string()));
        }

        let stars = input.stars.map(validate_stars).transpose()?;
        let comment = input.comment.as_deref().map(validate_comment).transpose()?;

        let mut updated = state.ratings[index].clone();
        if let Some(stars) = stars {
            updated.stars = stars;
        }
        if let Some(comment) = comment {
            updated.comment = comment;
        }
        updated.updated_at = Some(chrono::Utc::now());

        let mut next = state.ratings.clone();
        next[index] = updated.clone();
        self.commit(&mut state, next).await?;

        tracing::info!(rating_id, user_id = %user.id, "Rating updated");
        Ok(updated)
    }

    pub async fn delete_rating(&self, user: Option<&User>, rating_id: &str) -> Result<()> {
        let user = user.ok_or(AppError::Unauthenticated)?;
        let mut state = self.state.write().await;

        let rating = state
            .ratings
            .iter()
            .find(|r| r.id == rating_id)
            .ok_or_else(|| AppError::NotFound(messages::NOT_FOUND.to_string()))?;

        if rating.user_id != user.id {
            return Err(AppError::Forbidden(messages::CANNOT_DELETE.to_string()));
        }

        let next: Vec<Rating> = state
            .ratings
            .iter()
            .filter(|r| r.id != rating_id)
            .cloned()
            .collect();
        self.commit(&mut state, next).await?;

        tracing::info!(rating_id, user_id = %user.id, "Rating deleted");
        Ok(())
    }

    /// Ratings for a point, most recent first.
    pub async fn ratings_by_collection_point(&self, collection_point_id: &str) -> Vec<Rating> {
        let mut ratings: Vec<Rating> = self
            .state
            .read()
            .await
            .ratings
            .iter()
            .filter(|r| r.collection_point_id == collection_point_id)
            .cloned()
            .collect();
        newest_first(&mut ratings);
        ratings
    }

    /// Ratings authored by a user, most recent first.
    pub async fn ratings_by_user(&self, user_id: &str) -> Vec<Rating> {
        let mut ratings: Vec<Rating> = self
            .state
            .read()
            .await
            .ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut ratings);
        ratings
    }

    /// The current user's rating for a point. `None` when signed out.
    pub async fn user_rating_for_point(
        &self,
        user: Option<&User>,
        collection_point_id: &str,
    ) -> Option<Rating> {
        let user = user?;
        self.state
            .read()
            .await
            .ratings
            .iter()
            .find(|r| r.collection_point_id == collection_point_id && r.user_id == user.id)
            .cloned()
    }

    pub async fn stats_for_collection_point(&self, collection_point_id: &str) -> RatingStats {
        let state = self.state.read().await;
        RatingStats::from_ratings(
            collection_point_id,
            state
                .ratings
                .iter()
                .filter(|r| r.collection_point_id == collection_point_id),
        )
    }

    /// Filtered and sorted query over all ratings.
    pub async fn find_ratings(&self, filters: &RatingFilters) -> Vec<Rating> {
        let mut ratings: Vec<Rating> = self
            .state
            .read()
            .await
            .ratings
            .iter()
            .filter(|r| filters.matches(r))
            .cloned()
            .collect();
        ratings.sort_by(|a, b| filters.compare(a, b));
        ratings
    }
}
