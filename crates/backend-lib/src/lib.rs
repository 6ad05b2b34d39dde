// ============================
// todo-backend-lib/src/lib.rs
// ============================
//! Core of the multi-account todo API: authentication, ownership-scoped todo
//! access and the HTTP surface around them.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod ownership;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth, PasswordHasher, TokenKeys};
use crate::config::{ConfigError, Settings};
use crate::ownership::TodoService;
use crate::storage::Storage;

pub use crate::router::create_router;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Signup and login
    pub auth: Arc<dyn AuthService>,
    /// Token signing and verification keys
    pub tokens: Arc<TokenKeys>,
    /// Owner-scoped todo operations
    pub todos: TodoService<S>,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: S,
}

impl<S: Storage + Clone + 'static> AppState<S> {
    /// Build the application state
    ///
    /// Fails when the settings do not pass validation, most notably when no
    /// usable signing secret is configured.
    pub fn new(storage: S, settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let tokens = Arc::new(TokenKeys::from_secret(settings.jwt_secret()?.as_bytes()));
        let hasher = PasswordHasher::new(&settings.auth.hashing).map_err(|e| {
            ConfigError::Invalid {
                field: "auth.hashing",
                reason: e.to_string(),
            }
        })?;
        let auth: Arc<dyn AuthService> =
            Arc::new(DefaultAuth::new(storage.clone(), hasher, tokens.clone()));

        Ok(Self {
            auth,
            tokens,
            todos: TodoService::new(storage.clone()),
            settings: Arc::new(settings),
            storage,
        })
    }
}
