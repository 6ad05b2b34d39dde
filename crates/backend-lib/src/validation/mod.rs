// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request field validation.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::auth::password::{password_long_enough, MIN_PASSWORD_LENGTH};
use crate::error::AppError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Todo text is required")]
    MissingTodoText,

    #[error("Todo text cannot be empty")]
    EmptyTodoText,

    #[error("No fields to update")]
    EmptyUpdate,
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Treat absent and whitespace-only values alike
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Canonical form of an email address: trimmed and lower-cased
///
/// Used both when an account is created and when it is looked up, so
/// `A@X.com` and `a@x.com` name the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an already-normalized email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email address cannot be empty".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email address cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Invalid email address format".to_string(),
        ));
    }

    Ok(email)
}

/// Validate a signup password
pub fn validate_new_password(password: &str) -> ValidationResult<&str> {
    if !password_long_enough(password) {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(password)
}

/// Optional display name: trimmed, blank means none
pub fn normalize_display_name(name: Option<&str>) -> Option<String> {
    present(name).map(|n| n.trim().to_string())
}

/// Text for a new todo
pub fn todo_text(text: Option<&str>) -> ValidationResult<String> {
    present(text)
        .map(|t| t.trim().to_string())
        .ok_or(ValidationError::MissingTodoText)
}

/// Replacement text for an existing todo
pub fn replacement_todo_text(text: &str) -> ValidationResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTodoText);
    }
    Ok(trimmed.to_string())
}
