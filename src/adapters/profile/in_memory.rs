//! In-memory profile source for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::profile::UserProfileSnapshot;
use crate::ports::ProfileSource;

#[derive(Debug, Clone, Default)]
struct Entry {
    snapshot: UserProfileSnapshot,
    last_visit: Option<Timestamp>,
}

/// Profile source backed by a map. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileSource {
    entries: Arc<RwLock<HashMap<UserId, Entry>>>,
}

impl InMemoryProfileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a user's snapshot, keeping any recorded visit.
    pub async fn put(&self, user_id: UserId, snapshot: UserProfileSnapshot) {
        self.entries.write().await.entry(user_id).or_default().snapshot = snapshot;
    }

    /// Records the time of a user's visit.
    pub async fn record_visit(&self, user_id: UserId, at: Timestamp) {
        self.entries.write().await.entry(user_id).or_default().last_visit = Some(at);
    }
}

#[async_trait]
impl ProfileSource for InMemoryProfileSource {
    async fn load_snapshot(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfileSnapshot>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .get(user_id)
            .map(|e| e.snapshot.clone()))
    }

    async fn last_visit(&self, user_id: &UserId) -> Result<Option<Timestamp>, DomainError> {
        Ok(self.entries.read().await.get(user_id).and_then(|e| e.last_visit))
    }
}
