//! Task persistence behind a single trait.
//!
//! Handlers only see [`TaskStore`]; the server picks [`SqliteStore`] and the
//! tests pick [`MemoryStore`].

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use tasks_shared::Task;

/// Errors surfaced by a [`TaskStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(i64),

    #[error("no task ids left")]
    IdsExhausted,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage worker failed: {0}")]
    Worker(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn all_tasks(&self) -> Result<Vec<Task>>;

    async fn tasks_by_completion(&self, completed: bool) -> Result<Vec<Task>>;

    /// Fails with [`StoreError::NotFound`] when no task has this id.
    async fn task_by_id(&self, id: i64) -> Result<Task>;

    /// Inserts `task`, ignoring its `id`, and returns the id storage assigned.
    async fn add_task(&self, task: Task) -> Result<i64>;

    /// Replaces `name` and `completed` of the task with `task.id`.
    async fn edit_task(&self, task: Task) -> Result<()>;
}
