// ============================
// crates/backend-lib/src/storage/memory.rs
// ============================
//! In-process storage backed by sharded concurrent maps.
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{mapref::entry::Entry, DashMap};
use serde::{Deserialize, Serialize};
use todo_common::{TodoId, UserId};

use super::{
    duplicate_email, NewTodo, NewUser, Storage, TodoPatch, TodoRecord, UserRecord,
};
use crate::error::AppError;

/// Serializable copy of everything a [`MemoryStorage`] holds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub users: Vec<UserRecord>,
    pub todos: Vec<TodoRecord>,
}

struct Inner {
    users: DashMap<UserId, UserRecord>,
    /// normalized email -> user id
    emails: DashMap<String, UserId>,
    todos: DashMap<TodoId, TodoRecord>,
    next_user_id: AtomicU64,
    next_todo_id: AtomicU64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            todos: DashMap::new(),
            next_user_id: AtomicU64::new(1),
            next_todo_id: AtomicU64::new(1),
        }
    }
}

/// Concurrent in-memory implementation of [`Storage`]
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot, continuing id sequences after the
    /// highest ids present.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let inner = Inner::default();

        let mut max_user = 0;
        for user in snapshot.users {
            max_user = max_user.max(user.id);
            inner.emails.insert(user.email.clone(), user.id);
            inner.users.insert(user.id, user);
        }

        let mut max_todo = 0;
        for todo in snapshot.todos {
            max_todo = max_todo.max(todo.id);
            inner.todos.insert(todo.id, todo);
        }

        inner.next_user_id.store(max_user + 1, Ordering::SeqCst);
        inner.next_todo_id.store(max_todo + 1, Ordering::SeqCst);

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Copy out the current contents, ordered by id
    pub fn snapshot(&self) -> Snapshot {
        let mut users: Vec<UserRecord> =
            self.inner.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by_key(|u| u.id);

        let mut todos: Vec<TodoRecord> =
            self.inner.todos.iter().map(|t| t.value().clone()).collect();
        todos.sort_by_key(|t| t.id);

        Snapshot { users, todos }
    }

    /// Drop an account and its email mapping
    pub(super) fn forget_user(&self, user: &UserRecord) {
        self.inner.emails.remove_if(&user.email, |_, id| *id == user.id);
        self.inner.users.remove(&user.id);
    }

    /// Put a todo back exactly as it was
    pub(super) fn restore_todo(&self, todo: TodoRecord) {
        self.inner.todos.insert(todo.id, todo);
    }

    pub(super) fn remove_todo(&self, id: TodoId) -> Option<TodoRecord> {
        self.inner.todos.remove(&id).map(|(_, todo)| todo)
    }

    /// Remove and return every completed todo of `owner_id`
    pub(super) fn drain_completed(&self, owner_id: UserId) -> Vec<TodoRecord> {
        let mut drained = Vec::new();
        self.inner.todos.retain(|_, todo| {
            if todo.owner_id == owner_id && todo.completed {
                drained.push(todo.clone());
                return false;
            }
            true
        });
        drained
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let id = match self.inner.emails.get(email) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.inner.users.get(&id).map(|u| u.value().clone()))
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, AppError> {
        match self.inner.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(duplicate_email()),
            Entry::Vacant(slot) => {
                let id = self.inner.next_user_id.fetch_add(1, Ordering::SeqCst);
                let record = UserRecord {
                    id,
                    email: user.email,
                    password_hash: user.password_hash,
                    display_name: user.display_name,
                    created_at: Utc::now(),
                };
                self.inner.users.insert(id, record.clone());
                slot.insert(id);
                Ok(record)
            },
        }
    }

    async fn list_todos(&self, owner_id: UserId) -> Result<Vec<TodoRecord>, AppError> {
        let mut todos: Vec<TodoRecord> = self
            .inner
            .todos
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .map(|t| t.value().clone())
            .collect();
        todos.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(todos)
    }

    async fn get_todo(&self, id: TodoId) -> Result<Option<TodoRecord>, AppError> {
        Ok(self.inner.todos.get(&id).map(|t| t.value().clone()))
    }

    async fn insert_todo(&self, todo: NewTodo) -> Result<TodoRecord, AppError> {
        let id = self.inner.next_todo_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let record = TodoRecord {
            id,
            owner_id: todo.owner_id,
            text: todo.text,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.inner.todos.insert(id, record.clone());
        Ok(record)
    }

    async fn update_todo(
        &self,
        id: TodoId,
        patch: TodoPatch,
    ) -> Result<Option<TodoRecord>, AppError> {
        let Some(mut todo) = self.inner.todos.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(text) = patch.text {
            todo.text = text;
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        todo.updated_at = Utc::now();
        Ok(Some(todo.clone()))
    }

    async fn delete_todo(&self, id: TodoId) -> Result<bool, AppError> {
        Ok(self.remove_todo(id).is_some())
    }

    async fn delete_completed_todos(&self, owner_id: UserId) -> Result<u64, AppError> {
        Ok(self.drain_completed(owner_id).len() as u64)
    }
}
