//! Application handlers.
//!
//! Command handlers that orchestrate the dialogue engine and the ports.

pub mod assistant;

pub use assistant::{
    AssistantSession, OpenSessionCommand, OpenSessionError, OpenSessionHandler,
    OpenSessionResult, SendMessageCommand, SendMessageError, SessionSettings,
};
