//! Per-visit context used to pick greetings.

use serde::{Deserialize, Serialize};

use super::{TaskPriority, UserProfileSnapshot};
use crate::domain::foundation::Timestamp;

/// Visit recency and today's task figures.
///
/// Ephemeral: passed per call, never stored by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyContext {
    pub is_first_visit_today: bool,
    pub last_visit: Option<Timestamp>,
    pub completed_today_tasks: u32,
    pub pending_high_priority_tasks: u32,
}

impl DailyContext {
    /// Context for a user who already visited today.
    pub fn returning() -> Self {
        Self::default()
    }

    /// Context for the first visit of the day.
    pub fn first_visit(last_visit: Option<Timestamp>) -> Self {
        Self {
            is_first_visit_today: true,
            last_visit,
            ..Default::default()
        }
    }

    /// Derives the context from a snapshot and the previous visit time.
    ///
    /// Dates are compared in UTC. A missing `last_visit` counts as the
    /// first visit today.
    pub fn derive(
        snapshot: &UserProfileSnapshot,
        last_visit: Option<Timestamp>,
        now: Timestamp,
    ) -> Self {
        let is_first_visit_today = last_visit.map_or(true, |last| !last.is_same_day(&now));

        let completed_today_tasks = snapshot
            .tasks
            .iter()
            .filter(|t| !t.is_pending())
            .filter(|t| t.completed_at.is_some_and(|at| at.is_same_day(&now)))
            .count();

        let pending_high_priority_tasks = snapshot
            .pending_tasks()
            .filter(|t| t.priority == TaskPriority::High)
            .count();

        Self {
            is_first_visit_today,
            last_visit,
            completed_today_tasks: saturating_u32(completed_today_tasks),
            pending_high_priority_tasks: saturating_u32(pending_high_priority_tasks),
        }
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
