//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    AssistantSession, OpenSessionCommand, OpenSessionError, OpenSessionHandler,
    OpenSessionResult, SendMessageCommand, SendMessageError, SessionSettings,
};
