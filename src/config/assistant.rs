//! Dialogue engine configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::dialogue::{EngineSettings, HistoryBudget};

/// Limits for conversation history
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Most turns sent with a model request
    #[serde(default = "default_history_max_turns")]
    pub history_max_turns: usize,

    /// Turns returned by state queries
    #[serde(default = "default_recent_history_len")]
    pub recent_history_len: usize,

    /// Token budget for prompt plus history
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: u32,

    /// Tokens kept free for the reply
    #[serde(default = "default_reserved_for_response")]
    pub reserved_for_response: u32,
}

impl AssistantConfig {
    /// Engine settings derived from this section
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            recent_history_len: self.recent_history_len,
            history_budget: HistoryBudget::new(
                self.history_max_turns,
                self.max_context_tokens,
                self.reserved_for_response,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_max_turns == 0 {
            return Err(ValidationError::InvalidHistoryLimit);
        }
        if self.recent_history_len == 0 {
            return Err(ValidationError::InvalidRecentHistoryLen);
        }
        if self.reserved_for_response >= self.max_context_tokens {
            return Err(ValidationError::InvalidTokenBudget {
                max: self.max_context_tokens,
                reserved: self.reserved_for_response,
            });
        }
        Ok(())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            history_max_turns: default_history_max_turns(),
            recent_history_len: default_recent_history_len(),
            max_context_tokens: default_max_context_tokens(),
            reserved_for_response: default_reserved_for_response(),
        }
    }
}

fn default_history_max_turns() -> usize {
    40
}

fn default_recent_history_len() -> usize {
    10
}

fn default_max_context_tokens() -> u32 {
    8_000
}

fn default_reserved_for_response() -> u32 {
    1_000
}
