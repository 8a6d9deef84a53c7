//! JSON file adapter for the profile source.
//!
//! A profile document is a snapshot (`db_user`, `goals`, `tasks`) with an
//! optional `last_visit` timestamp next to it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::profile::UserProfileSnapshot;
use crate::ports::ProfileSource;

/// On-disk shape of one user's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(flatten)]
    pub snapshot: UserProfileSnapshot,
    #[serde(default)]
    pub last_visit: Option<Timestamp>,
}

#[derive(Debug, Clone)]
enum Layout {
    /// One file answers for every user.
    Single(PathBuf),
    /// `{dir}/{user_id}.json` per user.
    PerUser(PathBuf),
}

/// Reads profile documents from JSON files.
#[derive(Debug, Clone)]
pub struct JsonFileProfileSource {
    layout: Layout,
}

impl JsonFileProfileSource {
    /// Serves the same document to every user. Used by the console harness.
    pub fn single(path: impl AsRef<Path>) -> Self {
        Self {
            layout: Layout::Single(path.as_ref().to_path_buf()),
        }
    }

    /// Serves `{dir}/{user_id}.json`.
    pub fn per_user(dir: impl AsRef<Path>) -> Self {
        Self {
            layout: Layout::PerUser(dir.as_ref().to_path_buf()),
        }
    }

    fn file_path(&self, user_id: &UserId) -> PathBuf {
        match &self.layout {
            Layout::Single(path) => path.clone(),
            Layout::PerUser(dir) => dir.join(format!("{}.json", user_id.as_str())),
        }
    }

    /// Reads and parses the document; a missing file is `Ok(None)`.
    pub async fn read_document(&self, user_id: &UserId) -> Result<Option<ProfileDocument>, DomainError> {
        let path = self.file_path(user_id);

        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::new(
                    ErrorCode::ProfileUnavailable,
                    format!("Failed to read profile file: {}", e),
                )
                .with_detail("path", path.display().to_string()))
            }
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| {
            DomainError::new(
                ErrorCode::MalformedProfile,
                format!("Invalid profile JSON: {}", e),
            )
            .with_detail("path", path.display().to_string())
        })
    }
}

#[async_trait]
impl ProfileSource for JsonFileProfileSource {
    async fn load_snapshot(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfileSnapshot>, DomainError> {
        Ok(self.read_document(user_id).await?.map(|doc| doc.snapshot))
    }

    async fn last_visit(&self, user_id: &UserId) -> Result<Option<Timestamp>, DomainError> {
        Ok(self.read_document(user_id).await?.and_then(|doc| doc.last_visit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROFILE: &str = r#"{
        "db_user": {"first_name": "Ivan", "telegram_username": "ivan_dev", "level": 2},
        "goals": [
            {"id": 1, "title": "Learn Rust", "status": "active", "difficulty_level": 3},
            {"id": "b7c1", "goal": {"title": "Run 10k"}, "status": "completed", "progress_percentage": 100}
        ],
        "tasks": [
            {"id": 10, "task": {"title": "Read chapter 4"}, "status": "pending", "assigned_at": "2024-06-01T08:00:00Z"}
        ],
        "last_visit": "2024-06-01T09:30:00Z"
    }"#;

    fn user() -> UserId {
        UserId::from_telegram(123456)
    }

    #[tokio::test]
    async fn loads_snapshot_from_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, PROFILE).unwrap();

        let source = JsonFileProfileSource::single(&path);
        let snapshot = source.load_snapshot(&user()).await.unwrap().unwrap();

        assert_eq!(snapshot.identity.display_name(), Some("Ivan"));
        assert_eq!(snapshot.goals.len(), 2);
        assert_eq!(snapshot.goals[1].resolved_title(), Some("Run 10k"));
        assert_eq!(snapshot.tasks[0].resolved_title(), Some("Read chapter 4"));
        assert!(source.last_visit(&user()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn per_user_layout_uses_user_id_file_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("123456.json"), PROFILE).unwrap();

        let source = JsonFileProfileSource::per_user(dir.path());

        assert!(source.load_snapshot(&user()).await.unwrap().is_some());
        assert!(source
            .load_snapshot(&UserId::from_telegram(1))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn missing_file_is_unknown_user() {
        let dir = TempDir::new().unwrap();
        let source = JsonFileProfileSource::single(dir.path().join("absent.json"));

        assert!(source.load_snapshot(&user()).await.unwrap().is_none());
        assert!(source.last_visit(&user()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileProfileSource::single(&path)
            .load_snapshot(&user())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::MalformedProfile);
        assert!(err.details.contains_key("path"));
    }

    #[tokio::test]
    async fn empty_document_is_empty_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{}").unwrap();

        let snapshot = JsonFileProfileSource::single(&path)
            .load_snapshot(&user())
            .await
            .unwrap()
            .unwrap();

        assert!(snapshot.is_blank());
    }
}
