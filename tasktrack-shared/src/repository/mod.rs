/// Repository layer
///
/// Data access is expressed as traits with explicit query methods so the
/// services never touch SQL. [`SqliteStore`] implements both traits on top of
/// an sqlx pool.
///
/// # Ownership
///
/// Every task query takes the owning `user_id` and filters on it. A task that
/// belongs to someone else is reported exactly like a missing one.
///
/// # Transactions
///
/// Each task operation runs in its own transaction, committed before the
/// method returns. On any error the transaction is dropped and rolled back.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::models::{
    task::{NewTask, Task, TaskStatus},
    user::{NewUser, User},
};

mod tasks;
mod users;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Access to user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; `UniqueViolation` if the username is taken
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    /// Looks a user up by username
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// All users ordered by id
    async fn list_users(&self) -> StoreResult<Vec<User>>;
}

/// Access to tasks, always scoped to an owner
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a pending task stamped with the current UTC time
    async fn create_task(&self, task: NewTask) -> StoreResult<Task>;

    /// All tasks of `user_id`, oldest first
    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Task>>;

    /// One task, if it exists and belongs to `user_id`
    async fn find_by_id_for_user(&self, user_id: i64, task_id: i64)
        -> StoreResult<Option<Task>>;

    /// Sets the status of an owned task and returns the updated row
    async fn update_status_for_user(
        &self,
        user_id: i64,
        task_id: i64,
        status: TaskStatus,
    ) -> StoreResult<Option<Task>>;

    /// Deletes an owned task; true if a row was removed
    async fn delete_for_user(&self, user_id: i64, task_id: i64) -> StoreResult<bool>;
}

/// SQLite-backed implementation of the repositories
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wraps an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying pool (health checks, shutdown)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn map_unique(err: sqlx::Error, what: impl Into<String>) -> StoreError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            StoreError::UniqueViolation(what.into())
        }
        other => StoreError::Database(other),
    }
}
