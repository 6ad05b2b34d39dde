// ==========================
// tests/unit/error_tests.rs
// ==========================
//! Unit tests for the error taxonomy and its HTTP mapping
use axum::{
    body::to_bytes,
    http::StatusCode,
    response::IntoResponse,
};
use todo_backend_lib::{auth::TokenError, error::AppError};
use todo_common::ErrorBody;

async fn render(err: AppError) -> (StatusCode, ErrorBody) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_status_mapping() {
    let cases = [
        (AppError::validation("bad"), StatusCode::BAD_REQUEST, "VAL_001"),
        (AppError::Duplicate("taken".into()), StatusCode::BAD_REQUEST, "DUP_001"),
        (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED, "AUTH_001"),
        (AppError::TokenMissing, StatusCode::UNAUTHORIZED, "AUTH_002"),
        (AppError::NotFoundOrForbidden, StatusCode::NOT_FOUND, "NF_001"),
        (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR, "INT_001"),
    ];

    for (err, status, code) in cases {
        let (got_status, body) = render(err).await;
        assert_eq!(got_status, status);
        assert_eq!(body.code, code);
    }
}

#[tokio::test]
async fn test_token_failures_are_indistinguishable() {
    let (_, missing) = render(AppError::TokenMissing).await;
    for reason in [
        TokenError::Malformed,
        TokenError::InvalidSignature,
        TokenError::Expired,
    ] {
        let (status, body) = render(AppError::TokenInvalid(reason)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, missing);
    }
}

#[tokio::test]
async fn test_internal_details_stay_in_the_logs() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "/var/lib/todo/db.json: disk full");
    let (status, body) = render(AppError::Io(io)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "Internal server error");
    assert!(!body.error.contains("disk"));
}
