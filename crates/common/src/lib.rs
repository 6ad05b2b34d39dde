// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between todo clients and the server.
//! This module defines the JSON request and response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a registered user
pub type UserId = u64;

/// Identifier of a todo item
pub type TodoId = u64;

/// Body of `POST /signup`
///
/// Every field is optional on the wire so that a missing field surfaces as a
/// validation error with a readable message instead of a parse failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
}

/// Body of `POST /login`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a user. Never carries the password digest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
}

/// Response to a successful signup or login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    /// Human readable status line
    pub message: String,
    /// Signed bearer token for subsequent requests
    pub token: String,
    /// The authenticated user
    pub user: PublicUser,
}

/// A todo item as returned to its owner
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /todos`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CreateTodoRequest {
    pub text: Option<String>,
}

/// Body of `PUT /todos/{id}`. Absent fields are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateTodoRequest {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

/// Generic acknowledgement
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub message: String,
}

/// Response to `DELETE /todos/completed/all`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeleteCompletedResponse {
    pub message: String,
    /// Number of the caller's todos that were removed
    pub deleted: u64,
}

/// Error body returned for every failed request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// Client-facing message
    pub error: String,
    /// Stable machine-readable code
    pub code: String,
}

/// Response to `GET /health`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
