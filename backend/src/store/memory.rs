use async_trait::async_trait;
use parking_lot::RwLock;
use tasks_shared::Task;

use super::{Result, StoreError, TaskStore};

/// In-memory [`TaskStore`] that keeps tasks in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
            failure: None,
        }
    }

    /// A store whose every call fails with [`StoreError::Unavailable`].
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            tasks: RwLock::default(),
            failure: Some(message.into()),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.read().clone()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn filtered(&self, keep: impl Fn(&Task) -> bool) -> Result<Vec<Task>> {
        self.check()?;
        Ok(self.tasks.read().iter().filter(|t| keep(t)).cloned().collect())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn all_tasks(&self) -> Result<Vec<Task>> {
        self.filtered(|_| true)
    }

    async fn tasks_by_completion(&self, completed: bool) -> Result<Vec<Task>> {
        self.filtered(|t| t.completed == completed)
    }

    async fn task_by_id(&self, id: i64) -> Result<Task> {
        self.check()?;
        self.tasks
            .read()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn add_task(&self, task: Task) -> Result<i64> {
        self.check()?;
        let mut tasks = self.tasks.write();
        let id = match tasks.iter().map(|t| t.id).max() {
            Some(max) => max.checked_add(1).ok_or(StoreError::IdsExhausted)?,
            None => 0,
        };
        tasks.push(Task { id, ..task });
        Ok(id)
    }

    async fn edit_task(&self, task: Task) -> Result<()> {
        self.check()?;
        let mut tasks = self.tasks.write();
        let stored = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or(StoreError::NotFound(task.id))?;
        stored.name = task.name;
        stored.completed = task.completed;
        Ok(())
    }
}
