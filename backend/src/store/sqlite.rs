//! SQLite-backed [`TaskStore`].
//!
//! One connection behind a mutex; every call hops onto tokio's blocking pool
//! so a slow query never stalls the async workers.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tasks_shared::Task;

use super::{Result, StoreError, TaskStore};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS task (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT    NOT NULL DEFAULT '',
    completed INTEGER NOT NULL DEFAULT 0
)";

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the `task` table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || f(&conn.lock()))
            .await
            .map_err(|e| StoreError::Worker(e.to_string()))?
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        completed: row.get(2)?,
    })
}

#[async_trait]
impl TaskStore for SqliteStore {
    async fn all_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, completed FROM task ORDER BY id")?;
            let tasks = stmt
                .query_map([], task_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
        .await
    }

    async fn tasks_by_completion(&self, completed: bool) -> Result<Vec<Task>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, completed FROM task WHERE completed = ?1 ORDER BY id",
            )?;
            let tasks = stmt
                .query_map(params![completed], task_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
        .await
    }

    async fn task_by_id(&self, id: i64) -> Result<Task> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id, name, completed FROM task WHERE id = ?1",
                params![id],
                task_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound(id))
        })
        .await
    }

    async fn add_task(&self, task: Task) -> Result<i64> {
        self.with_conn(move |conn| {
            let _ = conn.execute(
                "INSERT INTO task (name, completed) VALUES (?1, ?2)",
                params![task.name, task.completed],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn edit_task(&self, task: Task) -> Result<()> {
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE task SET name = ?1, completed = ?2 WHERE id = ?3",
                params![task.name, task.completed, task.id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(task.id));
            }
            Ok(())
        })
        .await
    }
}
