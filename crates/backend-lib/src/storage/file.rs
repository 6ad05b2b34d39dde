// ============================
// crates/backend-lib/src/storage/file.rs
// ============================
//! Flat-file implementation of [`Storage`].
//!
//! All records live in memory and are written to `<root>/db.json` after every
//! mutation. Writes go to a temp file first and are renamed into place, so a
//! crash mid-write leaves the previous snapshot intact. A mutation whose write
//! fails is rolled back in memory before the error is returned.
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::{fs as tokio_fs, sync::Mutex};
use todo_common::{TodoId, UserId};

use super::memory::{MemoryStorage, Snapshot};
use super::{NewTodo, NewUser, Storage, TodoPatch, TodoRecord, UserRecord};
use crate::error::AppError;

const DB_FILE: &str = "db.json";

/// Flat-file implementation of the Storage trait
///
/// Every mutation rewrites the whole store, which keeps the format trivial and
/// suits small data sets only.
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
    records: MemoryStorage,
    /// Held across each mutation and its write, so rollbacks never clobber a
    /// later change.
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileStorage {
    /// Open (or create) a store rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let path = root.join(DB_FILE);
        let records = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            tracing::info!(
                users = snapshot.users.len(),
                todos = snapshot.todos.len(),
                path = %path.display(),
                "loaded storage snapshot"
            );
            MemoryStorage::from_snapshot(snapshot)
        } else {
            MemoryStorage::new()
        };

        Ok(Self {
            root,
            records,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Write the current contents to disk. Caller holds `write_lock`.
    async fn persist(&self) -> Result<(), AppError> {
        let snapshot = self.records.snapshot();
        let json = serde_json::to_vec_pretty(&snapshot)?;

        let path = self.root.join(DB_FILE);
        let tmp = self.root.join(format!("{DB_FILE}.tmp"));
        let written = match tokio_fs::write(&tmp, json).await {
            Ok(()) => tokio_fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            let _ = tokio_fs::remove_file(&tmp).await;
            tracing::error!(error = %e, path = %path.display(), "failed to write storage snapshot");
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        self.records.find_user_by_email(email).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, AppError> {
        let _guard = self.write_lock.lock().await;
        let record = self.records.insert_user(user).await?;
        if let Err(e) = self.persist().await {
            self.records.forget_user(&record);
            return Err(e);
        }
        Ok(record)
    }

    async fn list_todos(&self, owner_id: UserId) -> Result<Vec<TodoRecord>, AppError> {
        self.records.list_todos(owner_id).await
    }

    async fn get_todo(&self, id: TodoId) -> Result<Option<TodoRecord>, AppError> {
        self.records.get_todo(id).await
    }

    async fn insert_todo(&self, todo: NewTodo) -> Result<TodoRecord, AppError> {
        let _guard = self.write_lock.lock().await;
        let record = self.records.insert_todo(todo).await?;
        if let Err(e) = self.persist().await {
            self.records.remove_todo(record.id);
            return Err(e);
        }
        Ok(record)
    }

    async fn update_todo(
        &self,
        id: TodoId,
        patch: TodoPatch,
    ) -> Result<Option<TodoRecord>, AppError> {
        let _guard = self.write_lock.lock().await;
        let Some(before) = self.records.get_todo(id).await? else {
            return Ok(None);
        };
        let record = self.records.update_todo(id, patch).await?;
        if let Err(e) = self.persist().await {
            self.records.restore_todo(before);
            return Err(e);
        }
        Ok(record)
    }

    async fn delete_todo(&self, id: TodoId) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;
        let Some(removed) = self.records.remove_todo(id) else {
            return Ok(false);
        };
        if let Err(e) = self.persist().await {
            self.records.restore_todo(removed);
            return Err(e);
        }
        Ok(true)
    }

    async fn delete_completed_todos(&self, owner_id: UserId) -> Result<u64, AppError> {
        let _guard = self.write_lock.lock().await;
        let removed = self.records.drain_completed(owner_id);
        if removed.is_empty() {
            return Ok(0);
        }
        if let Err(e) = self.persist().await {
            for todo in removed {
                self.records.restore_todo(todo);
            }
            return Err(e);
        }
        Ok(removed.len() as u64)
    }
}
