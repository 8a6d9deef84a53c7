//! Goals the user is working on.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::identity::non_blank;
use crate::domain::foundation::{Percentage, RecordId};

/// Lifecycle status of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
    Archived,
    /// Any status this version does not know; treated as open.
    #[serde(other)]
    Other,
}

impl GoalStatus {
    /// Store representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
            Self::Archived => "archived",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry a user goal was created from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTemplate {
    pub title: Option<String>,
}

/// A user goal as stored upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: RecordId,
    /// Title set on the user goal itself.
    pub title: Option<String>,
    /// Joined catalog goal; its title is used when the row has none.
    #[serde(rename = "goal")]
    pub template: Option<GoalTemplate>,
    #[serde(default)]
    pub status: GoalStatus,
    pub difficulty_level: Option<u8>,
    pub progress_percentage: Option<Percentage>,
}

impl Goal {
    /// Creates a goal with a title.
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>, status: GoalStatus) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            template: None,
            status,
            difficulty_level: None,
            progress_percentage: None,
        }
    }

    /// Creates a goal that only carries its catalog title.
    pub fn from_template(
        id: impl Into<RecordId>,
        template_title: impl Into<String>,
        status: GoalStatus,
    ) -> Self {
        Self {
            id: id.into(),
            title: None,
            template: Some(GoalTemplate {
                title: Some(template_title.into()),
            }),
            status,
            difficulty_level: None,
            progress_percentage: None,
        }
    }

    /// Sets the difficulty level.
    pub fn with_difficulty(mut self, level: u8) -> Self {
        self.difficulty_level = Some(level);
        self
    }

    /// Sets the progress.
    pub fn with_progress(mut self, progress: Percentage) -> Self {
        self.progress_percentage = Some(progress);
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

    /// Returns true when the goal is not completed.
    ///
    /// Paused and archived goals count as open, matching the store's
    /// "anything but completed" convention.
    pub fn is_open(&self) -> bool {
        self.status != GoalStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_title_preferred() {
        let mut goal = Goal::new(1, "Learn Rust", GoalStatus::Active);
        goal.template = Some(GoalTemplate {
            title: Some("Catalog".to_string()),
        });
        assert_eq!(goal.resolved_title(), Some("Learn Rust"));
    }

    #[test]
    fn template_title_used_as_fallback() {
        let goal = Goal::from_template(2, "Run a marathon", GoalStatus::Active);
        assert_eq!(goal.resolved_title(), Some("Run a marathon"));
    }

    #[test]
    fn no_title_resolves_to_none() {
        let mut goal = Goal::new(3, "", GoalStatus::Active);
        goal.template = Some(GoalTemplate::default());
        assert_eq!(goal.resolved_title(), None);
    }

    #[test]
    fn only_completed_goals_are_closed() {
        assert!(Goal::new(1, "a", GoalStatus::Active).is_open());
        assert!(Goal::new(1, "a", GoalStatus::Paused).is_open());
        assert!(!Goal::new(1, "a", GoalStatus::Completed).is_open());
    }

    #[test]
    fn deserializes_store_row() {
        let goal: Goal = serde_json::from_str(
            r#"{
                "id": 7,
                "status": "completed",
                "difficulty_level": 3,
                "progress_percentage": 100,
                "goal": {"title": "Read 12 books"}
            }"#,
        )
        .unwrap();

        assert_eq!(goal.id, RecordId::Numeric(7));
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.resolved_title(), Some("Read 12 books"));
        assert_eq!(goal.progress_percentage, Some(Percentage::new(100)));
    }

    #[test]
    fn unknown_status_and_fractional_progress_are_tolerated() {
        let goal: Goal = serde_json::from_str(
            r#"{"id": 8, "title": "Swim", "status": "in_progress", "progress_percentage": 42.4}"#,
        )
        .unwrap();

        assert_eq!(goal.status, GoalStatus::Other);
        assert!(goal.is_open());
        assert_eq!(goal.progress_percentage, Some(Percentage::new(42)));
    }
}
