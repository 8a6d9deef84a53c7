//! The scenario transition table.

use serde::{Deserialize, Serialize};

use super::{DialogueStep, ScenarioEvent};

/// Returns the step that follows `from` when `event` occurs.
///
/// Total over every step and event pair. The only case where the
/// source step matters is the first goal-less contact, which goes to
/// onboarding instead of the repeated goal prompt.
pub fn next_step(from: DialogueStep, event: ScenarioEvent) -> DialogueStep {
    use DialogueStep::*;
    use ScenarioEvent::*;

    match (from, event) {
        (Init, NoGoals) => Onboarding,
        (Onboarding, NoGoals) => GoalMissing,
        (GoalMissing, NoGoals) => GoalMissing,
        (TaskSelection, NoGoals) => GoalMissing,
        (FreeFormQuestion, NoGoals) => GoalMissing,

        (Init, PendingTasks(_)) => TaskSelection,
        (Onboarding, PendingTasks(_)) => TaskSelection,
        (GoalMissing, PendingTasks(_)) => TaskSelection,
        (TaskSelection, PendingTasks(_)) => TaskSelection,
        (FreeFormQuestion, PendingTasks(_)) => TaskSelection,

        (Init, Idle) => FreeFormQuestion,
        (Onboarding, Idle) => FreeFormQuestion,
        (GoalMissing, Idle) => FreeFormQuestion,
        (TaskSelection, Idle) => FreeFormQuestion,
        (FreeFormQuestion, Idle) => FreeFormQuestion,
    }
}

/// Record of one applied transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTransition {
    pub from: DialogueStep,
    pub to: DialogueStep,
    pub event: ScenarioEvent,
}

impl StepTransition {
    /// Applies the table to `from` and records the result.
    pub fn apply(from: DialogueStep, event: ScenarioEvent) -> Self {
        Self {
            from,
            to: next_step(from, event),
            event,
        }
    }

    /// Returns true if the step changed.
    pub fn changed_step(&self) -> bool {
        self.from != self.to
    }
}
