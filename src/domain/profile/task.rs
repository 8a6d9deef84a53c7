//! Tasks assigned to the user.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::identity::non_blank;
use crate::domain::foundation::{RecordId, Timestamp};

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Skipped,
    /// Any status this version does not know; treated as pending.
    #[serde(other)]
    Other,
}

impl TaskStatus {
    /// Store representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// Catalog entry a user task was assigned from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub title: Option<String>,
}

/// A user task as stored upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub title: Option<String>,
    #[serde(rename = "task")]
    pub template: Option<TaskTemplate>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub assigned_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

impl Task {
    /// Creates a task with a title.
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            template: None,
            status,
            priority: TaskPriority::default(),
            assigned_at: None,
            completed_at: None,
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assignment time.
    pub fn assigned(mut self, at: Timestamp) -> Self {
        self.assigned_at = Some(at);
        self
    }

    /// Marks the task completed at the given time.
    pub fn completed(mut self, at: Timestamp) -> Self {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(at);
        self
    }

    /// Own title, then catalog title.
    pub fn resolved_title(&self) -> Option<&str> {
        non_blank(self.title.as_deref()).or_else(|| {
            self.template
                .as_ref()
                .and_then(|t| non_blank(t.title.as_deref()))
        })
    }

    /// Returns true when the task is not completed.
    pub fn is_pending(&self) -> bool {
        self.status != TaskStatus::Completed
    }
}
