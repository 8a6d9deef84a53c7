//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("history_max_turns must be at least 1")]
    InvalidHistoryLimit,

    #[error("recent_history_len must be at least 1")]
    InvalidRecentHistoryLen,

    #[error("reserved_for_response ({reserved}) must be below max_context_tokens ({max})")]
    InvalidTokenBudget { max: u32, reserved: u32 },

    #[error("Invalid model request timeout")]
    InvalidTimeout,

    #[error("max_tokens must be at least 1")]
    InvalidMaxTokens,

    #[error("temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
