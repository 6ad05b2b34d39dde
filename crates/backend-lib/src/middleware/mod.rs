// crates/backend-lib/src/middleware/mod.rs

//! Request middleware for the todo API.

pub mod auth;

pub use auth::{bearer_token, require_auth};
