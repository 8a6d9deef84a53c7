//! User profile domain module.
//!
//! Typed view of the data the assistant reads from the identity and
//! persistence store: who the user is, their goals and their tasks.

mod daily;
mod goal;
mod identity;
mod snapshot;
mod task;

pub use daily::DailyContext;
pub use goal::{Goal, GoalStatus, GoalTemplate};
pub use identity::Identity;
pub use snapshot::UserProfileSnapshot;
pub use task::{Task, TaskPriority, TaskStatus, TaskTemplate};
