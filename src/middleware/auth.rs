// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware.

use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Authenticated user taken from the stored session.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Middleware that requires a valid stored session.
///
/// The device holds a single session; requests are attributed to it.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(session) = state.sessions.load_session().await else {
        return AppError::Unauthenticated.into_response();
    };

    request.extensions_mut().insert(AuthUser(session.user));
    next.run(request).await
}
