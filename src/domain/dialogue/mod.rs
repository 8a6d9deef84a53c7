//! Dialogue domain module.
//!
//! Conversation state for one chat, the scenario transition table, and
//! the text generators that read the user's profile snapshot.

mod engine;
mod event;
mod greetings;
mod history;
mod prompts;
mod sanitizer;
mod scenarios;
mod state;
mod step;
mod transition;

pub use engine::{
    AssistantReply, DialogueEngine, EngineSettings, ModelOutcome, ModelTurn, ReplySource,
    ScenarioReply,
};
pub use event::ScenarioEvent;
pub use greetings::{daily_greeting, interesting_suggestion, welcome_message};
pub use history::{HistoryBudget, HistoryWindow, WindowedHistory};
pub use prompts::{system_instructions, system_prompt};
pub use sanitizer::{ReplySanitizer, SanitizationError, MAX_REPLY_LENGTH};
pub use scenarios::{
    context_based_prompt, context_based_prompt_for, ScenarioContext, ScenarioKey, ScenarioProfile,
};
pub use state::{ChatTurn, DialogueState, DialogueStateView, Sender};
pub use step::DialogueStep;
pub use transition::{next_step, StepTransition};
