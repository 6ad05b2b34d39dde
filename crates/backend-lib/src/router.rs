// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP routing for the todo API.
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request},
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::Settings;
use crate::handlers::{auth, health, todos};
use crate::middleware::require_auth;
use crate::storage::Storage;
use crate::AppState;

/// Create the application router
///
/// `/health`, `/signup` and `/login` are public. Everything under `/todos`
/// passes through [`require_auth`] first.
pub fn create_router<S: Storage + Send + Sync + 'static>(state: Arc<AppState<S>>) -> Router {
    let protected = Router::new()
        .route("/todos", get(todos::list::<S>).post(todos::create::<S>))
        .route(
            "/todos/{id}",
            get(todos::get_one::<S>)
                .put(todos::update::<S>)
                .delete(todos::delete::<S>),
        )
        .route("/todos/completed/all", delete(todos::delete_completed::<S>))
        .route_layer(from_fn_with_state(state.clone(), require_auth::<S>));

    Router::new()
        .route("/health", get(health::health))
        .route("/signup", post(auth::signup::<S>))
        .route("/login", post(auth::login::<S>))
        .merge(protected)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(cors_layer(&state.settings))
        .with_state(state)
}

/// CORS for the configured browser origin; `*` allows any origin without credentials
fn cors_layer(settings: &Settings) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600));

    if settings.cors_origin.trim() == "*" {
        return base.allow_origin(Any);
    }

    match HeaderValue::from_str(settings.cors_origin.trim()) {
        Ok(origin) => base.allow_origin(origin).allow_credentials(true),
        Err(_) => {
            tracing::warn!(origin = %settings.cors_origin, "unusable CORS origin, cross-origin requests disabled");
            base
        },
    }
}
