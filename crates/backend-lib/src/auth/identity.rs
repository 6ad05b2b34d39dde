// ============================
// crates/backend-lib/src/auth/identity.rs
// ============================
//! Verified caller identity carried through a single request.
use axum::{extract::FromRequestParts, http::request::Parts};
use todo_common::UserId;

use crate::error::AppError;

/// Who is making the current request
///
/// Inserted into request extensions by [`crate::middleware::require_auth`] after
/// the bearer token checks out. Lives only as long as the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Absent only when a route was mounted without the gate.
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AppError::TokenMissing)
    }
}
