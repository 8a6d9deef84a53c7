//! ProfileSource port - read side of the identity and persistence store.

use async_trait::async_trait;

use crate::domain::{
    foundation::{DomainError, Timestamp, UserId},
    profile::UserProfileSnapshot,
};

/// Query operations for the data the assistant reads about a user.
///
/// The assistant never writes through this port.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Loads the user's identity, goals and tasks.
    ///
    /// Returns `Ok(None)` for an unknown user; callers treat that as the
    /// empty profile.
    async fn load_snapshot(&self, user_id: &UserId)
        -> Result<Option<UserProfileSnapshot>, DomainError>;

    /// Time of the user's previous visit, if any was recorded.
    async fn last_visit(&self, user_id: &UserId) -> Result<Option<Timestamp>, DomainError>;
}
