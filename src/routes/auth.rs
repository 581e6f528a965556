// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes.
//!
//! The OAuth exchange happens outside this service: the caller posts the
//! identity returned by the provider together with its access token.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{AuthProvider, Session, User};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/auth/session",
            get(current_session).post(sign_in).delete(sign_out),
        )
        .route("/auth/session/refresh", post(refresh))
}

/// Provider identity plus access token.
#[derive(Deserialize)]
pub struct SignInRequest {
    pub user: User,
    pub token: String,
}

/// Session as exposed to view layers. The token never leaves the device store.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: User,
    pub provider: AuthProvider,
    pub expires_at: i64,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user,
            provider: session.provider,
            expires_at: session.expires_at,
        }
    }
}

/// Store a session for an identity already verified by the provider.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<SessionResponse>> {
    if body.token.trim().is_empty() {
        return Err(AppError::BadRequest("token must not be empty".to_string()));
    }
    if body.user.id.trim().is_empty() {
        return Err(AppError::BadRequest("user.id must not be empty".to_string()));
    }

    let session = state.sessions.save_session(&body.user, &body.token).await?;
    Ok(Json(session.into()))
}

async fn current_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionResponse>> {
    let session = state
        .sessions
        .load_session()
        .await
        .ok_or(AppError::Unauthenticated)?;
    Ok(Json(session.into()))
}

async fn sign_out(State(state): State<Arc<AppState>>) -> Result<StatusCode> {
    state.sessions.clear_session().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn refresh(State(state): State<Arc<AppState>>) -> Result<Json<SessionResponse>> {
    let session = state
        .sessions
        .refresh_session()
        .await?
        .ok_or(AppError::Unauthenticated)?;
    Ok(Json(session.into()))
}
