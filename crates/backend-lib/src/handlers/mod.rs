// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers. Each one is a thin shell over the auth or todo services.
pub mod auth;
pub mod health;
pub mod todos;
