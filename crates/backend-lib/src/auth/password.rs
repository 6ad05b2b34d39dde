// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Digests are scrypt PHC strings with a fresh random salt per call. Hashing is
//! deliberately slow, so [`PasswordHasher`] moves the work onto tokio's blocking
//! pool and caps how many digests are computed at once.
use std::sync::Arc;

use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};
use tokio::sync::Semaphore;
use zeroize::Zeroizing;

use crate::config::HashingSettings;
use crate::error::AppError;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Build scrypt parameters from configuration
pub fn scrypt_params(settings: &HashingSettings) -> Result<Params, AppError> {
    Params::new(settings.log_n, settings.r, settings.p, Params::RECOMMENDED_LEN)
        .map_err(|e| AppError::Internal(format!("Invalid scrypt parameters: {e}")))
}

/// Hash a password using scrypt
pub fn hash_password(plain: &str, params: Params) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
///
/// An unparseable digest is treated as a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Check the length rule applied at signup
pub fn password_long_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

/// Concurrency-bounded password hashing service
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    permits: Arc<Semaphore>,
    /// Digest of a random string, verified against when a login names an
    /// unknown account so both failure paths cost one scrypt evaluation.
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Create a hasher from configuration
    pub fn new(settings: &HashingSettings) -> Result<Self, AppError> {
        let params = scrypt_params(settings)?;
        let filler = SaltString::generate(&mut OsRng);
        let dummy_hash = hash_password(filler.as_str(), params)?;

        Ok(Self {
            params,
            permits: Arc::new(Semaphore::new(settings.max_concurrent.max(1))),
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hash `plain` on the blocking pool
    pub async fn hash(&self, plain: &str) -> Result<String, AppError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AppError::Internal(format!("Hashing pool closed: {e}")))?;

        let plain = Zeroizing::new(plain.to_owned());
        let params = self.params;
        // The permit travels with the job, so it is held until scrypt returns
        // even if this future is dropped first.
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            hash_password(&plain, params)
        })
        .await?
    }

    /// Verify `plain` against `digest` on the blocking pool
    ///
    /// Never fails: a mismatch, a corrupt digest, or a lost worker all read as
    /// `false`.
    pub async fn verify(&self, plain: &str, digest: &str) -> bool {
        let permit = match self.permits.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::error!(error = %e, "hashing pool closed during verify");
                return false;
            },
        };

        let plain = Zeroizing::new(plain.to_owned());
        let digest = digest.to_owned();
        let job = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            verify_password(&plain, &digest)
        });
        match job.await {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!(error = %e, "password verification task failed");
                false
            },
        }
    }

    /// Burn one verification against the dummy digest
    pub async fn verify_dummy(&self, plain: &str) {
        let dummy = self.dummy_hash.clone();
        let _ = self.verify(plain, &dummy).await;
    }
}
