//! Dialogue steps.
//!
//! A step records which scenario the conversation is in. Unlike the
//! message history, it is what the scenario handlers branch on.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The scenario stage of one user's conversation.
///
/// - `Init`: nothing exchanged yet, or just reset
/// - `Onboarding`: first contact with a user who has no goals
/// - `GoalMissing`: the user still has no goals after onboarding
/// - `TaskSelection`: unfinished tasks exist, helping pick one
/// - `FreeFormQuestion`: everything is in order, open conversation
///
/// There is no terminal step; only a reset returns to `Init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStep {
    #[default]
    Init,
    Onboarding,
    GoalMissing,
    TaskSelection,
    FreeFormQuestion,
}

impl DialogueStep {
    /// All steps, in declaration order.
    pub const ALL: [DialogueStep; 5] = [
        DialogueStep::Init,
        DialogueStep::Onboarding,
        DialogueStep::GoalMissing,
        DialogueStep::TaskSelection,
        DialogueStep::FreeFormQuestion,
    ];

    /// Instruction given to the language model while in this step.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Init => "Greet the user and find out what they want help with.",
            Self::Onboarding => {
                "The user has no goals yet. Explain briefly how goals work and help them formulate a first one."
            }
            Self::GoalMissing => {
                "The user still has no goals. Offer once more to create a first goal and keep the answer short."
            }
            Self::TaskSelection => {
                "The user has unfinished tasks. Help them choose where to start, or answer their question."
            }
            Self::FreeFormQuestion => {
                "Answer the user's question, referring to their goals and tasks where relevant."
            }
        }
    }

    /// Short label for logs and UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Init => "Start",
            Self::Onboarding => "Onboarding",
            Self::GoalMissing => "Goal missing",
            Self::TaskSelection => "Task selection",
            Self::FreeFormQuestion => "Free-form question",
        }
    }

    /// Returns true in the steps that steer the user towards creating a goal.
    pub fn is_goal_prompting(&self) -> bool {
        matches!(self, Self::Onboarding | Self::GoalMissing)
    }
}

impl StateMachine for DialogueStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DialogueStep::*;
        match self {
            Init => vec![Onboarding, TaskSelection, FreeFormQuestion],
            Onboarding | GoalMissing | TaskSelection | FreeFormQuestion => {
                vec![GoalMissing, TaskSelection, FreeFormQuestion]
            }
        }
    }
}
