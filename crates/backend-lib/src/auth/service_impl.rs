// ============================
// crates/backend-lib/src/auth/service_impl.rs
// ============================
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;

use crate::auth::{AuthOutcome, AuthService, PasswordHasher, TokenKeys};
use crate::error::AppError;
use crate::metrics::{LOGIN_FAILED, LOGIN_SUCCEEDED, SIGNUP_COMPLETED};
use crate::storage::{NewUser, Storage, UserRecord};
use crate::validation::{
    normalize_display_name, normalize_email, present, validate_email, validate_new_password,
    ValidationError,
};

/// Signup and login against a [`Storage`] backend
pub struct DefaultAuth<S> {
    storage: S,
    hasher: PasswordHasher,
    tokens: Arc<TokenKeys>,
}

impl<S: Storage> DefaultAuth<S> {
    pub fn new(storage: S, hasher: PasswordHasher, tokens: Arc<TokenKeys>) -> Self {
        Self {
            storage,
            hasher,
            tokens,
        }
    }

    fn issue_for(&self, user: &UserRecord) -> Result<AuthOutcome, AppError> {
        let token = self
            .tokens
            .issue(user.id, &user.email, Utc::now())
            .map_err(|e| AppError::Internal(format!("Token signing failed: {e}")))?;
        Ok(AuthOutcome {
            user: user.public(),
            token,
        })
    }
}

#[async_trait]
impl<S: Storage> AuthService for DefaultAuth<S> {
    #[tracing::instrument(skip_all)]
    async fn signup(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        display_name: Option<&str>,
    ) -> Result<AuthOutcome, AppError> {
        let (Some(email), Some(password)) = (present(email), present(password)) else {
            return Err(ValidationError::MissingCredentials.into());
        };
        validate_new_password(password)?;

        let email = normalize_email(email);
        validate_email(&email)?;

        if self.storage.find_user_by_email(&email).await?.is_some() {
            tracing::debug!("signup rejected: email already registered");
            return Err(crate::storage::duplicate_email());
        }

        let password_hash = self.hasher.hash(password).await?;
        let user = self
            .storage
            .insert_user(NewUser {
                email,
                password_hash,
                display_name: normalize_display_name(display_name),
            })
            .await?;

        counter!(SIGNUP_COMPLETED).increment(1);
        tracing::info!(user_id = user.id, "user registered");
        self.issue_for(&user)
    }

    #[tracing::instrument(skip_all)]
    async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<AuthOutcome, AppError> {
        let (Some(email), Some(password)) = (present(email), present(password)) else {
            return Err(ValidationError::MissingCredentials.into());
        };
        let email = normalize_email(email);

        let Some(user) = self.storage.find_user_by_email(&email).await? else {
            self.hasher.verify_dummy(password).await;
            counter!(LOGIN_FAILED).increment(1);
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash).await {
            counter!(LOGIN_FAILED).increment(1);
            return Err(AppError::InvalidCredentials);
        }

        counter!(LOGIN_SUCCEEDED).increment(1);
        tracing::info!(user_id = user.id, "user logged in");
        self.issue_for(&user)
    }
}
