// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use recicla_core::error::AppError;
use validator::Validate;

async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_status_mapping() {
    let cases = [
        (AppError::Unauthenticated, StatusCode::UNAUTHORIZED),
        (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
        (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        (AppError::Conflict("x".into()), StatusCode::CONFLICT),
        (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
        (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
        (AppError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, expected) in cases {
        assert_eq!(err.into_response().status(), expected);
    }
}

#[tokio::test]
async fn test_user_message_is_in_details() {
    let (status, body) = body_json(AppError::Conflict(
        "Você já avaliou este ponto. Use a opção de editar.".to_string(),
    ))
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(
        body["details"],
        "Você já avaliou este ponto. Use a opção de editar."
    );

    let (_, body) = body_json(AppError::Unauthenticated).await;
    assert_eq!(body["details"], "Usuário não autenticado");
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let (status, body) = body_json(AppError::Internal(anyhow::anyhow!("disk on fire"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert!(body.get("details").is_none());
}

#[derive(Validate)]
struct StarsInput {
    #[validate(range(min = 1, max = 5))]
    stars: u8,
}

#[test]
fn test_validation_errors_become_bad_request() {
    let err: AppError = StarsInput { stars: 9 }.validate().unwrap_err().into();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(err.to_string().contains("stars"));
}
