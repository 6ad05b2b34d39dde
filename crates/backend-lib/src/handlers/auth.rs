// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use todo_common::{AuthResponse, LoginRequest, SignupRequest};

use crate::auth::AuthOutcome;
use crate::error::AppError;
use crate::extract::AppJson;
use crate::storage::Storage;
use crate::AppState;

fn respond(message: &str, outcome: AuthOutcome) -> AppJson<AuthResponse> {
    AppJson(AuthResponse {
        message: message.to_string(),
        token: outcome.token,
        user: outcome.user,
    })
}

/// `POST /signup`
pub async fn signup<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AppJson(body): AppJson<SignupRequest>,
) -> Result<(StatusCode, AppJson<AuthResponse>), AppError> {
    let outcome = state
        .auth
        .signup(
            body.email.as_deref(),
            body.password.as_deref(),
            body.display_name.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, respond("User created successfully", outcome)))
}

/// `POST /login`
pub async fn login<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<AppJson<AuthResponse>, AppError> {
    let outcome = state
        .auth
        .login(body.email.as_deref(), body.password.as_deref())
        .await?;
    Ok(respond("Login successful", outcome))
}
