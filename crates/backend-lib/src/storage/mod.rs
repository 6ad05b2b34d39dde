// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction for users and todos.
//!
//! Implementations are plain keyed stores: they know nothing about callers or
//! ownership. Scoping todos to their owner is [`crate::ownership`]'s job.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_common::{PublicUser, Todo, TodoId, UserId};

use crate::error::AppError;

mod file;
mod memory;

pub use file::FlatFileStorage;
pub use memory::MemoryStorage;

/// A stored account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    /// Normalized email
    pub email: String,
    /// scrypt PHC string
    pub password_hash: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// The fields that may leave the server
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Account data supplied at signup
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
}

/// A stored todo, including its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: TodoId,
    pub owner_id: UserId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoRecord {
    /// Client view; drops the owner id
    pub fn to_todo(&self) -> Todo {
        Todo {
            id: self.id,
            text: self.text.clone(),
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A todo about to be created
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub owner_id: UserId,
    pub text: String,
}

/// Partial update of a todo; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Look up an account by normalized email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Create an account
    ///
    /// Fails with [`AppError::Duplicate`] if the email is already taken, even
    /// when two inserts race.
    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, AppError>;

    /// All todos belonging to `owner_id`, newest first
    async fn list_todos(&self, owner_id: UserId) -> Result<Vec<TodoRecord>, AppError>;

    /// Fetch a todo by id regardless of owner
    async fn get_todo(&self, id: TodoId) -> Result<Option<TodoRecord>, AppError>;

    /// Create a todo
    async fn insert_todo(&self, todo: NewTodo) -> Result<TodoRecord, AppError>;

    /// Apply `patch` to a todo; `None` if it does not exist
    async fn update_todo(
        &self,
        id: TodoId,
        patch: TodoPatch,
    ) -> Result<Option<TodoRecord>, AppError>;

    /// Remove a todo; `false` if it did not exist
    async fn delete_todo(&self, id: TodoId) -> Result<bool, AppError>;

    /// Remove every completed todo of `owner_id`, returning how many went
    async fn delete_completed_todos(&self, owner_id: UserId) -> Result<u64, AppError>;
}

pub(crate) fn duplicate_email() -> AppError {
    AppError::Duplicate("User with this email already exists".to_string())
}
