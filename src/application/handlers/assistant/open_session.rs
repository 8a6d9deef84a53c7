//! OpenSessionHandler - Starts an assistant session for a user.

use std::sync::Arc;

use thiserror::Error;

use super::{AssistantSession, SessionSettings};
use crate::domain::dialogue::{DialogueEngine, EngineSettings};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::profile::DailyContext;
use crate::ports::{AIProvider, ProfileSource};

/// Command to open a chat with the assistant.
#[derive(Debug, Clone)]
pub struct OpenSessionCommand {
    pub user_id: UserId,
}

/// Errors that can occur when opening a session.
#[derive(Debug, Error)]
pub enum OpenSessionError {
    #[error("Profile could not be loaded: {0}")]
    Profile(#[from] DomainError),
}

/// Result of opening a session.
pub struct OpenSessionResult<A: AIProvider + 'static> {
    pub session: AssistantSession<A>,
    /// Welcome text to show first.
    pub greeting: String,
    pub daily: DailyContext,
}

/// Handler for opening sessions.
pub struct OpenSessionHandler<P: ProfileSource, A: AIProvider + 'static> {
    profiles: Arc<P>,
    provider: Arc<A>,
    engine_settings: EngineSettings,
    session_settings: SessionSettings,
}

impl<P: ProfileSource, A: AIProvider + 'static> OpenSessionHandler<P, A> {
    pub fn new(
        profiles: Arc<P>,
        provider: Arc<A>,
        engine_settings: EngineSettings,
        session_settings: SessionSettings,
    ) -> Self {
        Self {
            profiles,
            provider,
            engine_settings,
            session_settings,
        }
    }

    /// Loads the profile, derives the visit context and builds the greeting.
    ///
    /// Unknown users get the empty profile. A user with no recorded visit
    /// is greeted as new rather than welcomed back.
    pub async fn handle(
        &self,
        cmd: OpenSessionCommand,
    ) -> Result<OpenSessionResult<A>, OpenSessionError> {
        let snapshot = self.profiles.load_snapshot(&cmd.user_id).await?;
        let last_visit = self.profiles.last_visit(&cmd.user_id).await?;
        let known_user = snapshot.is_some();

        let engine = DialogueEngine::with_settings(snapshot, self.engine_settings);
        let daily = DailyContext::derive(engine.snapshot(), last_visit, Timestamp::now());
        let greeting = match last_visit {
            Some(_) => engine.generate_welcome_message(Some(&daily)),
            None => engine.generate_welcome_message(None),
        };

        tracing::info!(
            user_id = %cmd.user_id,
            known_user,
            first_visit_today = daily.is_first_visit_today,
            "assistant session opened"
        );

        let session = AssistantSession::new(
            engine,
            Arc::clone(&self.provider),
            self.session_settings,
        )
        .with_user(cmd.user_id);

        Ok(OpenSessionResult {
            session,
            greeting,
            daily,
        })
    }
}
