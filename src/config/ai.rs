//! Language-model configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::SessionSettings;

/// Language-model configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AiConfig {
    /// Ask the model for replies; scenario replies only when false
    #[serde(default)]
    pub enabled: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Session settings derived from this section
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            use_model: self.enabled,
            timeout: self.timeout(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    800
}

fn default_temperature() -> f32 {
    0.7
}
