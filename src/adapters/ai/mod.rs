//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Scripted replies with call tracking, for tests
//! - `OfflineAIProvider` - Used when no model is configured; always unavailable

mod mock_provider;
mod offline_provider;

pub use mock_provider::{MockAIProvider, MockError};
pub use offline_provider::OfflineAIProvider;
