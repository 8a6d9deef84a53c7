//! Application configuration module
//!
//! Configuration is read from environment variables with the `WEAI`
//! prefix; nested values are separated by double underscores. Every
//! section has defaults, so an empty environment yields a working
//! scenario-only assistant.
//!
//! # Example
//!
//! ```no_run
//! use weai_assistant::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod assistant;
mod error;
mod log;

pub use ai::AiConfig;
pub use assistant::AssistantConfig;
pub use error::{ConfigError, ValidationError};
pub use log::LogConfig;

use serde::Deserialize;
use std::path::PathBuf;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// History and context limits
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Language-model settings
    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub log: LogConfig,

    /// JSON profile document; the assistant starts with a blank profile
    /// when unset
    #[serde(default)]
    pub profile_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` when present, then reads `WEAI__*` variables:
    ///
    /// - `WEAI__AI__ENABLED=true` -> `ai.enabled = true`
    /// - `WEAI__ASSISTANT__HISTORY_MAX_TURNS=20` -> `assistant.history_max_turns = 20`
    /// - `WEAI__PROFILE_PATH=./me.json` -> `profile_path = ./me.json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its field type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("WEAI").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.assistant.validate()?;
        self.ai.validate()?;
        self.log.validate()?;
        Ok(())
    }
}
