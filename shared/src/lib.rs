use serde::{Deserialize, Serialize};

/// A task record as stored and as sent over the wire.
///
/// Every field defaults when absent from a JSON payload, so an update body
/// may carry only `name` and `completed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: i64, name: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            name: name.into(),
            completed,
        }
    }

    /// The task created by `POST /tasks`: no name, not completed, id left to storage.
    pub fn blank() -> Self {
        Self::default()
    }
}
