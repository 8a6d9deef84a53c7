//! Profile source adapters.

mod in_memory;
mod json_file;

pub use in_memory::InMemoryProfileSource;
pub use json_file::{JsonFileProfileSource, ProfileDocument};
