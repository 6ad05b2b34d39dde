// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
//!
//! Every failure a handler can produce ends up here, and [`AppError::into_response`]
//! is the only place that decides what a client gets to see. Credential and token
//! failures share one generic body each, and "not yours" is indistinguishable
//! from "does not exist".
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_common::ErrorBody;

use crate::auth::TokenError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate resource: {0}")]
    Duplicate(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    TokenMissing,

    #[error("Invalid token: {0}")]
    TokenInvalid(#[from] TokenError),

    #[error("Resource not found or not owned by caller")]
    NotFoundOrForbidden,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Duplicate(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::TokenMissing | AppError::TokenInvalid(_) => {
                StatusCode::UNAUTHORIZED
            },
            AppError::NotFoundOrForbidden => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::Duplicate(_) => "DUP_001",
            AppError::InvalidCredentials => "AUTH_001",
            // Missing and invalid tokens must not be told apart by clients.
            AppError::TokenMissing | AppError::TokenInvalid(_) => "AUTH_002",
            AppError::NotFoundOrForbidden => "NF_001",
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => "INT_001",
        }
    }

    /// Get the message that is safe to hand to a client
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Duplicate(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::TokenMissing | AppError::TokenInvalid(_) => {
                "Authentication required".to_string()
            },
            AppError::NotFoundOrForbidden => "Todo not found".to_string(),
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                "Internal server error".to_string()
            },
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::TokenMissing => {
                tracing::debug!("request rejected: no bearer token");
            },
            AppError::TokenInvalid(kind) => {
                tracing::debug!(reason = %kind, "request rejected: token verification failed");
            },
            _ if status.is_server_error() => {
                tracing::error!(error = %self, "request failed with internal error");
            },
            _ => {},
        }

        let body = ErrorBody {
            error: self.sanitized_message(),
            code: self.error_code().to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Background task failed: {err}"))
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
