//! Assistant chat handlers.

mod open_session;
mod session;

pub use open_session::{
    OpenSessionCommand, OpenSessionError, OpenSessionHandler, OpenSessionResult,
};
pub use session::{AssistantSession, SendMessageCommand, SendMessageError, SessionSettings};
