//! Domain layer containing the assistant's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (value objects, IDs, errors, state machine trait)
//! - `profile` - Read-only user profile snapshot: identity, goals, tasks
//! - `dialogue` - Dialogue engine, scenario steps and prompt generation

pub mod dialogue;
pub mod foundation;
pub mod profile;
