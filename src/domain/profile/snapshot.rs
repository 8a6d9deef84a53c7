//! Read-only view of a user's profile, goals and tasks.

use serde::{Deserialize, Serialize};

use super::{Goal, Identity, Task};

/// Everything the assistant knows about the user for one engine binding.
///
/// Supplied by the identity/persistence store and never mutated by the
/// dialogue engine. To reflect changes, bind a fresh snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileSnapshot {
    #[serde(default, alias = "db_user")]
    pub identity: Identity,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl UserProfileSnapshot {
    /// Creates a snapshot.
    pub fn new(identity: Identity, goals: Vec<Goal>, tasks: Vec<Task>) -> Self {
        Self {
            identity,
            goals,
            tasks,
        }
    }

    /// The empty profile: no identity, goals or tasks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the user has any goal at all.
    pub fn has_goals(&self) -> bool {
        !self.goals.is_empty()
    }

    /// Returns true if the profile holds neither goals nor tasks.
    pub fn is_blank(&self) -> bool {
        self.goals.is_empty() && self.tasks.is_empty()
    }

    /// Goals that are not completed, in store order.
    pub fn open_goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|g| g.is_open())
    }

    /// Tasks that are not completed, in store order.
    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_pending())
    }

    /// Number of goals that are not completed.
    pub fn open_goal_count(&self) -> usize {
        self.open_goals().count()
    }

    /// Number of tasks that are not completed.
    pub fn pending_task_count(&self) -> usize {
        self.pending_tasks().count()
    }
}
