//! Scenario classification of an incoming message.

use serde::{Deserialize, Serialize};

use crate::domain::profile::UserProfileSnapshot;

/// What the scenario table reacts to when a message arrives.
///
/// Derived from the profile snapshot alone; the message text is not
/// inspected for intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// The user has no goals at all.
    NoGoals,
    /// Goals exist and this many tasks are unfinished.
    PendingTasks(usize),
    /// Goals exist and every task is finished.
    Idle,
}

impl ScenarioEvent {
    /// Classifies the snapshot. Goal emptiness is checked before tasks.
    pub fn classify(snapshot: &UserProfileSnapshot) -> Self {
        if !snapshot.has_goals() {
            return Self::NoGoals;
        }
        match snapshot.pending_task_count() {
            0 => Self::Idle,
            n => Self::PendingTasks(n),
        }
    }

    /// Deterministic reply for this event.
    pub fn reply_text(&self) -> String {
        match self {
            Self::NoGoals => "У тебя пока нет целей. Хочешь создать первую цель?".to_string(),
            Self::PendingTasks(n) => format!(
                "У тебя {} незавершённых задач. С какой начнём? Или задай вопрос!",
                n
            ),
            Self::Idle => {
                "Спасибо за сообщение! Я готов помочь с твоими целями и задачами.".to_string()
            }
        }
    }
}
