use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use metrics::counter;

use crate::auth::Identity;
use crate::error::AppError;
use crate::metrics::TOKEN_REJECTED;
use crate::storage::Storage;
use crate::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication gate for protected routes
///
/// A verified token attaches an [`Identity`] to the request. Every failure
/// surfaces as the same 401; the reason is only logged.
pub async fn require_auth<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(request.headers()) else {
        return Err(AppError::TokenMissing);
    };

    let claims = match state.tokens.verify(token, Utc::now()) {
        Ok(claims) => claims,
        Err(e) => {
            counter!(TOKEN_REJECTED).increment(1);
            return Err(e.into());
        },
    };
    let user_id = claims.user_id().inspect_err(|_| {
        counter!(TOKEN_REJECTED).increment(1);
    })?;

    request.extensions_mut().insert(Identity {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
