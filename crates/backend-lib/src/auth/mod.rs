// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod identity;
pub mod password;
pub mod token;
mod service;
mod service_impl;

pub use identity::Identity;
pub use password::{hash_password, verify_password, PasswordHasher, MIN_PASSWORD_LENGTH};
pub use service::{AuthOutcome, AuthService};
pub use service_impl::DefaultAuth;
pub use token::{token_ttl, Claims, TokenError, TokenKeys, TOKEN_TTL_SECS};
