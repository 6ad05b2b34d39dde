// ============================
// crates/backend-lib/src/extract.rs
// ============================
//! JSON extractor whose rejections use the API's error body.
use axum::{
    extract::FromRequest,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

/// Like [`axum::Json`], but a malformed body becomes an [`AppError`] 400
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
