use async_trait::async_trait;
use todo_common::PublicUser;

use crate::error::AppError;

/// A freshly authenticated user and the token issued for them
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: PublicUser,
    pub token: String,
}

/// Credential verification: account creation and login
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account and issue its first token
    async fn signup(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        display_name: Option<&str>,
    ) -> Result<AuthOutcome, AppError>;

    /// Check credentials and issue a token
    ///
    /// An unknown email and a wrong password fail identically.
    async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<AuthOutcome, AppError>;
}
