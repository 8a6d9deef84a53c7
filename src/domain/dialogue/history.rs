//! History windowing for model requests.
//!
//! The stored history is never trimmed. When a model request is built,
//! only the most recent turns that fit the turn limit and the token
//! budget are sent, preceded by a short summary of what was dropped.

use super::state::estimate_tokens;
use super::{ChatTurn, Sender};

/// Limits applied when selecting history for a model request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryBudget {
    /// Maximum number of turns sent.
    pub max_turns: usize,
    /// Maximum tokens for system prompt plus history.
    pub max_context_tokens: u32,
    /// Tokens kept free for the reply.
    pub reserved_for_response: u32,
}

impl HistoryBudget {
    pub fn new(max_turns: usize, max_context_tokens: u32, reserved_for_response: u32) -> Self {
        Self {
            max_turns,
            max_context_tokens,
            reserved_for_response,
        }
    }

    /// Tokens available for the prompt and history.
    pub fn available_for_messages(&self) -> u32 {
        self.max_context_tokens.saturating_sub(self.reserved_for_response)
    }
}

impl Default for HistoryBudget {
    fn default() -> Self {
        Self::new(40, 8_000, 1_000)
    }
}

/// The slice of history chosen for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowedHistory {
    /// Selected turns, oldest first.
    pub turns: Vec<ChatTurn>,
    /// Turns left out.
    pub truncated_count: usize,
    /// Summary of the left-out turns, if there was room for one.
    pub summary: Option<String>,
    /// Estimated tokens of prompt, summary and turns.
    pub estimated_tokens: u32,
}

impl WindowedHistory {
    pub fn was_truncated(&self) -> bool {
        self.truncated_count > 0
    }
}

const SUMMARY_SNIPPETS: usize = 3;
const SNIPPET_CHARS: usize = 50;

/// Selects the most recent history that fits a [`HistoryBudget`].
#[derive(Debug, Clone, Default)]
pub struct HistoryWindow {
    budget: HistoryBudget,
}

impl HistoryWindow {
    pub fn new(budget: HistoryBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> &HistoryBudget {
        &self.budget
    }

    /// Picks turns from newest to oldest until a limit is reached.
    pub fn select(&self, system_prompt: &str, history: &[ChatTurn]) -> WindowedHistory {
        let available = self.budget.available_for_messages();
        let mut tokens = estimate_tokens(system_prompt);
        let mut first_included = history.len();

        for (i, turn) in history.iter().enumerate().rev() {
            if history.len() - i > self.budget.max_turns {
                break;
            }
            let turn_tokens = turn.estimate_tokens();
            if tokens.saturating_add(turn_tokens) > available {
                break;
            }
            tokens += turn_tokens;
            first_included = i;
        }

        let truncated_count = first_included;
        let mut summary = None;
        if truncated_count > 0 {
            let text = summarize(&history[..first_included]);
            let summary_tokens = estimate_tokens(&text);
            if tokens.saturating_add(summary_tokens) <= available {
                tokens += summary_tokens;
                summary = Some(text);
            }
        }

        WindowedHistory {
            turns: history[first_included..].to_vec(),
            truncated_count,
            summary,
            estimated_tokens: tokens,
        }
    }
}

fn summarize(dropped: &[ChatTurn]) -> String {
    let snippets: Vec<String> = dropped
        .iter()
        .filter(|t| t.sender == Sender::User)
        .take(SUMMARY_SNIPPETS)
        .map(|t| {
            let snippet: String = t.text.chars().take(SNIPPET_CHARS).collect();
            if t.text.chars().count() > SNIPPET_CHARS {
                format!("{}...", snippet)
            } else {
                snippet
            }
        })
        .collect();

    format!(
        "[Earlier conversation ({} turns omitted): {}]",
        dropped.len(),
        snippets.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(count: usize, content_len: usize) -> Vec<ChatTurn> {
        (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::user(format!("question {} {}", i, "x".repeat(content_len)))
                } else {
                    ChatTurn::assistant(format!("answer {} {}", i, "x".repeat(content_len)))
                }
            })
            .collect()
    }

    mod history_budget {
        use super::*;

        #[test]
        fn available_subtracts_reserved() {
            assert_eq!(HistoryBudget::new(10, 8_000, 1_000).available_for_messages(), 7_000);
        }

        #[test]
        fn available_handles_underflow() {
            assert_eq!(HistoryBudget::new(10, 500, 1_000).available_for_messages(), 0);
        }
    }

    mod history_window {
        use super::*;

        #[test]
        fn short_history_is_sent_whole() {
            let window = HistoryWindow::default();
            let history = conversation(4, 10);

            let selected = window.select("prompt", &history);

            assert_eq!(selected.turns, history);
            assert!(!selected.was_truncated());
            assert!(selected.summary.is_none());
        }

        #[test]
        fn turn_limit_keeps_newest() {
            let window = HistoryWindow::new(HistoryBudget::new(3, 8_000, 1_000));
            let history = conversation(10, 5);

            let selected = window.select("prompt", &history);

            assert_eq!(selected.turns.len(), 3);
            assert_eq!(selected.turns[..], history[7..]);
            assert_eq!(selected.truncated_count, 7);
        }

        #[test]
        fn token_budget_truncates() {
            let window = HistoryWindow::new(HistoryBudget::new(100, 300, 50));
            let history = conversation(20, 200);

            let selected = window.select("prompt", &history);

            assert!(selected.was_truncated());
            assert!(!selected.turns.is_empty());
            assert!(selected.estimated_tokens <= 250);
        }

        #[test]
        fn dropped_turns_are_summarized_when_room_remains() {
            let window = HistoryWindow::new(HistoryBudget::new(2, 2_000, 0));
            let history = conversation(8, 200);

            let selected = window.select("prompt", &history);

            assert_eq!(selected.truncated_count, 6);
            let summary = selected.summary.expect("summary should fit");
            assert!(summary.starts_with("[Earlier conversation ("));
            assert!(summary.contains("question 0"));
        }

        #[test]
        fn zero_budget_sends_nothing() {
            let window = HistoryWindow::new(HistoryBudget::new(10, 0, 0));
            let selected = window.select("", &conversation(3, 10));

            assert!(selected.turns.is_empty());
            assert_eq!(selected.truncated_count, 3);
        }

        #[test]
        fn snippets_are_cut_on_char_boundaries() {
            let dropped = vec![ChatTurn::user("ж".repeat(80))];
            let summary = summarize(&dropped);
            assert!(summary.contains(&format!("{}...", "ж".repeat(50))));
        }
    }
}
