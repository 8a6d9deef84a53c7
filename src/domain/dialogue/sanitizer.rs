//! Cleaning of model replies before they reach the user.

use thiserror::Error;

/// Maximum accepted reply length in characters.
pub const MAX_REPLY_LENGTH: usize = 20_000;

/// Phrases that only appear in the hidden prompt blocks.
const HIDDEN_MARKERS: [&str; 8] = [
    "Контекст пользователя:",
    "Список целей:",
    "Список задач:",
    "CURRENT STEP:",
    "CORE PRINCIPLES:",
    "DEBUG INFORMATION:",
    "CURRENT USER CONTEXT:",
    "GOALS AND TASKS CONTEXT:",
];

const INJECTION_MARKERS: [&str; 11] = [
    "```system",
    "```assistant",
    "[INST]",
    "[/INST]",
    "<|system|>",
    "<|assistant|>",
    "<|user|>",
    "<|im_start|>",
    "<|im_end|>",
    "<<SYS>>",
    "<</SYS>>",
];

/// Why a reply was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanitizationError {
    #[error("Reply too long: {actual} characters exceeds maximum of {max}")]
    TooLong { max: usize, actual: usize },

    #[error("Reply is empty after sanitization")]
    Empty,

    #[error("Reply reveals hidden prompt content")]
    RevealsHiddenContext,
}

/// Strips control characters and chat-template markers from model
/// replies, and rejects replies that echo the hidden prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplySanitizer;

impl ReplySanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Cleans `reply` and checks it against `hidden_prompt`.
    pub fn clean(&self, reply: &str, hidden_prompt: &str) -> Result<String, SanitizationError> {
        let actual = reply.chars().count();
        if actual > MAX_REPLY_LENGTH {
            return Err(SanitizationError::TooLong {
                max: MAX_REPLY_LENGTH,
                actual,
            });
        }

        let cleaned: String = reply
            .chars()
            .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
            .collect();
        let stripped = strip_markers(&cleaned);
        let trimmed = stripped.trim();

        if trimmed.is_empty() {
            return Err(SanitizationError::Empty);
        }
        if reveals_hidden_context(trimmed, hidden_prompt) {
            return Err(SanitizationError::RevealsHiddenContext);
        }

        Ok(trimmed.to_string())
    }

}

fn strip_markers(s: &str) -> String {
    let mut result = s.to_string();
    for pattern in INJECTION_MARKERS {
        result = result.replace(pattern, "");
    }
    result
}

/// Hidden lines at least this long are leaks on their own.
const LONG_LINE_CHARS: usize = 40;

/// Shorter hidden lines are ignored below this length.
const SHORT_LINE_CHARS: usize = 6;

/// Goal and task lines of the context block carry this tag.
const RECORD_LINE_TAG: &str = "(статус:";

/// Returns true if the reply quotes a hidden block heading, copies a long
/// hidden line or a goal/task line verbatim, or copies two or more short
/// hidden lines.
fn reveals_hidden_context(reply: &str, hidden_prompt: &str) -> bool {
    if HIDDEN_MARKERS.iter().any(|m| reply.contains(m)) {
        return true;
    }

    let mut short_hits = 0;
    for line in hidden_prompt.lines().map(str::trim) {
        let len = line.chars().count();
        if len < SHORT_LINE_CHARS || !reply.contains(line) {
            continue;
        }
        if len >= LONG_LINE_CHARS || line.contains(RECORD_LINE_TAG) {
            return true;
        }
        short_hits += 1;
        if short_hits >= 2 {
            return true;
        }
    }
    false
}
