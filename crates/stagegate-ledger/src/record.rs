use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stagegate_model::{Role, TaskId};

/// Proof that `role` completed `task`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Completed task
    pub task: TaskId,
    /// Row the task was completed in
    pub role: Role,
    /// When it was marked done
    pub completed_at: DateTime<Utc>,
}

impl CompletionRecord {
    /// Record completed at `completed_at`
    #[must_use]
    pub fn new(task: TaskId, role: Role, completed_at: DateTime<Utc>) -> Self {
        Self {
            task,
            role,
            completed_at,
        }
    }

    /// Record completed now
    #[must_use]
    pub fn now(task: TaskId, role: Role) -> Self {
        Self::new(task, role, Utc::now())
    }

    /// Ledger key
    #[inline]
    #[must_use]
    pub fn key(&self) -> (TaskId, Role) {
        (self.task, self.role)
    }
}
