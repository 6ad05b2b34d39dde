// ============================
// crates/backend-lib/src/handlers/todos.rs
// ============================
//! Todo routes. All of them sit behind the authentication gate, so an
//! [`Identity`] is always present.
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use todo_common::{
    CreateTodoRequest, DeleteCompletedResponse, MessageResponse, Todo, UpdateTodoRequest,
};

use crate::auth::Identity;
use crate::error::AppError;
use crate::extract::AppJson;
use crate::ownership::parse_todo_id;
use crate::storage::Storage;
use crate::AppState;

type Shared<S> = State<Arc<AppState<S>>>;

/// `GET /todos`
pub async fn list<S: Storage + Send + Sync + 'static>(
    State(state): Shared<S>,
    identity: Identity,
) -> Result<AppJson<Vec<Todo>>, AppError> {
    Ok(AppJson(state.todos.list(&identity).await?))
}

/// `POST /todos`
pub async fn create<S: Storage + Send + Sync + 'static>(
    State(state): Shared<S>,
    identity: Identity,
    AppJson(body): AppJson<CreateTodoRequest>,
) -> Result<(StatusCode, AppJson<Todo>), AppError> {
    let todo = state.todos.create(&identity, body.text.as_deref()).await?;
    Ok((StatusCode::CREATED, AppJson(todo)))
}

/// `GET /todos/{id}`
pub async fn get_one<S: Storage + Send + Sync + 'static>(
    State(state): Shared<S>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<AppJson<Todo>, AppError> {
    let id = parse_todo_id(&id)?;
    Ok(AppJson(state.todos.get(&identity, id).await?))
}

/// `PUT /todos/{id}`
pub async fn update<S: Storage + Send + Sync + 'static>(
    State(state): Shared<S>,
    identity: Identity,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateTodoRequest>,
) -> Result<AppJson<Todo>, AppError> {
    let id = parse_todo_id(&id)?;
    Ok(AppJson(state.todos.update(&identity, id, body).await?))
}

/// `DELETE /todos/{id}`
pub async fn delete<S: Storage + Send + Sync + 'static>(
    State(state): Shared<S>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<AppJson<MessageResponse>, AppError> {
    let id = parse_todo_id(&id)?;
    state.todos.delete(&identity, id).await?;
    Ok(AppJson(MessageResponse {
        message: "Todo deleted successfully".to_string(),
    }))
}

/// `DELETE /todos/completed/all`
pub async fn delete_completed<S: Storage + Send + Sync + 'static>(
    State(state): Shared<S>,
    identity: Identity,
) -> Result<AppJson<DeleteCompletedResponse>, AppError> {
    let deleted = state.todos.delete_completed(&identity).await?;
    Ok(AppJson(DeleteCompletedResponse {
        message: format!("{deleted} completed todos deleted"),
        deleted,
    }))
}
