//! Conversation state: the current step and the turn history.

use serde::{Deserialize, Serialize};

use super::DialogueStep;
use crate::domain::foundation::Timestamp;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub sender: Sender,
    pub text: String,
    pub timestamp: Timestamp,
}

impl ChatTurn {
    /// A user turn stamped now.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// An assistant turn stamped now.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Estimates the token count for this turn.
    ///
    /// Roughly four characters per token plus a fixed overhead for the
    /// role marker.
    pub fn estimate_tokens(&self) -> u32 {
        estimate_tokens(&self.text) + 4
    }
}

/// Rough token estimate for a piece of text.
pub(crate) fn estimate_tokens(text: &str) -> u32 {
    u32::try_from(text.chars().count() / 4).unwrap_or(u32::MAX)
}

/// The mutable part of a conversation.
///
/// History is append-only between resets. Only the engine mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    step: DialogueStep,
    history: Vec<ChatTurn>,
}

impl DialogueState {
    /// Fresh state at `Init` with no history.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> DialogueStep {
        self.step
    }

    /// Full history, oldest first.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[ChatTurn] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    pub(crate) fn push(&mut self, turn: ChatTurn) {
        self.history.push(turn);
    }

    pub(crate) fn set_step(&mut self, step: DialogueStep) {
        self.step = step;
    }

    pub(crate) fn clear(&mut self) {
        self.step = DialogueStep::Init;
        self.history.clear();
    }
}

/// Read-only view handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueStateView {
    pub step: DialogueStep,
    pub recent_history: Vec<ChatTurn>,
    pub total_turns: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_init_and_empty() {
        let state = DialogueState::new();
        assert_eq!(state.step(), DialogueStep::Init);
        assert!(state.history().is_empty());
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut state = DialogueState::new();
        for i in 0..5 {
            state.push(ChatTurn::user(format!("m{}", i)));
        }

        let texts: Vec<_> = state.recent(2).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["m3", "m4"]);
    }

    #[test]
    fn recent_with_short_history_returns_everything() {
        let mut state = DialogueState::new();
        state.push(ChatTurn::user("only"));
        assert_eq!(state.recent(10).len(), 1);
    }

    #[test]
    fn clear_returns_to_init() {
        let mut state = DialogueState::new();
        state.set_step(DialogueStep::TaskSelection);
        state.push(ChatTurn::assistant("hi"));

        state.clear();

        assert_eq!(state, DialogueState::new());
    }

    #[test]
    fn token_estimate_counts_characters() {
        // Cyrillic is two bytes per char; the estimate must not double.
        let turn = ChatTurn::user("п".repeat(400));
        assert_eq!(turn.estimate_tokens(), 104);
    }

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::Assistant).unwrap(), "\"assistant\"");
    }
}
