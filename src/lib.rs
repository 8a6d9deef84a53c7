//! WeAi Assistant - dialogue core for the WeAi mini-app assistant.
//!
//! Keeps one user's conversation state, renders greetings and hidden
//! model prompts from their goals and tasks, and answers messages from a
//! scenario table, optionally enriched by a language model.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
