//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - Language-model providers (mock, offline)
//! - `profile` - Profile sources (JSON files, in-memory)

pub mod ai;
pub mod profile;

pub use ai::{MockAIProvider, MockError, OfflineAIProvider};
pub use profile::{InMemoryProfileSource, JsonFileProfileSource, ProfileDocument};
