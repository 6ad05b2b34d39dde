use axum::Json;
use todo_common::HealthResponse;

/// Liveness probe; needs no token
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Todo API is running".to_string(),
    })
}
