// ============================
// crates/backend-lib/src/ownership.rs
// ============================
//! Owner-scoped access to todos.
//!
//! Every operation takes the caller's [`Identity`]. Reads and bulk writes are
//! filtered by owner; single-item writes check existence and ownership
//! together, and a todo owned by someone else is reported exactly like one
//! that does not exist.
use metrics::counter;
use todo_common::{Todo, TodoId, UpdateTodoRequest};

use crate::auth::Identity;
use crate::error::AppError;
use crate::metrics::{TODO_CREATED, TODO_DELETED};
use crate::storage::{NewTodo, Storage, TodoPatch, TodoRecord};
use crate::validation::{replacement_todo_text, todo_text, ValidationError};

/// Parse a todo id taken from a URL path
///
/// Anything that is not a valid id cannot name one of the caller's todos.
pub fn parse_todo_id(raw: &str) -> Result<TodoId, AppError> {
    raw.parse().map_err(|_| AppError::NotFoundOrForbidden)
}

/// Todo operations, always scoped to the calling identity
#[derive(Clone)]
pub struct TodoService<S> {
    storage: S,
}

impl<S: Storage> TodoService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Fetch a todo only if `identity` owns it
    async fn owned(&self, identity: &Identity, id: TodoId) -> Result<TodoRecord, AppError> {
        match self.storage.get_todo(id).await? {
            Some(todo) if todo.owner_id == identity.user_id => Ok(todo),
            Some(_) => {
                tracing::debug!(todo_id = id, user_id = identity.user_id, "todo owned by another user");
                Err(AppError::NotFoundOrForbidden)
            },
            None => Err(AppError::NotFoundOrForbidden),
        }
    }

    /// The caller's todos, newest first
    pub async fn list(&self, identity: &Identity) -> Result<Vec<Todo>, AppError> {
        let todos = self.storage.list_todos(identity.user_id).await?;
        Ok(todos.iter().map(TodoRecord::to_todo).collect())
    }

    /// One of the caller's todos
    pub async fn get(&self, identity: &Identity, id: TodoId) -> Result<Todo, AppError> {
        Ok(self.owned(identity, id).await?.to_todo())
    }

    /// Create a todo owned by the caller
    pub async fn create(&self, identity: &Identity, text: Option<&str>) -> Result<Todo, AppError> {
        let text = todo_text(text)?;
        let todo = self
            .storage
            .insert_todo(NewTodo {
                owner_id: identity.user_id,
                text,
            })
            .await?;

        counter!(TODO_CREATED).increment(1);
        Ok(todo.to_todo())
    }

    /// Change text and/or completion of one of the caller's todos
    ///
    /// Ownership is settled before the body is looked at, so a foreign id gets
    /// a 404 even when the body is also invalid.
    pub async fn update(
        &self,
        identity: &Identity,
        id: TodoId,
        changes: UpdateTodoRequest,
    ) -> Result<Todo, AppError> {
        self.owned(identity, id).await?;

        let patch = TodoPatch {
            text: changes
                .text
                .as_deref()
                .map(replacement_todo_text)
                .transpose()?,
            completed: changes.completed,
        };
        if patch.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }

        self.storage
            .update_todo(id, patch)
            .await?
            .map(|todo| todo.to_todo())
            // Deleted between the ownership check and the write.
            .ok_or(AppError::NotFoundOrForbidden)
    }

    /// Delete one of the caller's todos
    pub async fn delete(&self, identity: &Identity, id: TodoId) -> Result<(), AppError> {
        self.owned(identity, id).await?;
        if !self.storage.delete_todo(id).await? {
            return Err(AppError::NotFoundOrForbidden);
        }

        counter!(TODO_DELETED).increment(1);
        Ok(())
    }

    /// Delete every completed todo of the caller; returns how many went
    pub async fn delete_completed(&self, identity: &Identity) -> Result<u64, AppError> {
        let removed = self.storage.delete_completed_todos(identity.user_id).await?;
        counter!(TODO_DELETED).increment(removed);
        Ok(removed)
    }
}
