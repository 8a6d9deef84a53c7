//! AssistantSession - async wrapper around one chat's dialogue engine.
//!
//! Calls on a session are serialized through the engine lock. When model
//! replies are enabled, each message spawns one completion task; a newer
//! message, a reset, `close()` or dropping the session aborts it. The
//! aborted turn still gets its scenario reply recorded so the history
//! stays paired.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::task::AbortHandle;

use crate::domain::dialogue::{
    AssistantReply, DialogueEngine, DialogueStateView, ModelOutcome, ModelTurn,
};
use crate::domain::foundation::UserId;
use crate::domain::profile::{DailyContext, UserProfileSnapshot};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message, MessageRole,
    RequestMetadata,
};

/// How a session talks to the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    /// When false, every reply comes from the scenario table.
    pub use_model: bool,
    /// Upper bound for one model call.
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            use_model: false,
            timeout: Duration::from_secs(30),
            max_tokens: 800,
            temperature: 0.7,
        }
    }
}

/// Command to send a user message.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub content: String,
}

impl SendMessageCommand {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Errors that can occur when sending a message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendMessageError {
    /// Message content is empty or whitespace only.
    #[error("Validation error: message content cannot be empty")]
    EmptyContent,

    #[error("Session is closed")]
    SessionClosed,
}

/// One active chat.
pub struct AssistantSession<A: AIProvider + 'static> {
    user_id: Option<UserId>,
    engine: tokio::sync::Mutex<DialogueEngine>,
    provider: Arc<A>,
    settings: SessionSettings,
    in_flight: Mutex<Option<AbortHandle>>,
    latest_ticket: AtomicU64,
    closed: AtomicBool,
}

impl<A: AIProvider + 'static> AssistantSession<A> {
    pub fn new(engine: DialogueEngine, provider: Arc<A>, settings: SessionSettings) -> Self {
        Self {
            user_id: None,
            engine: tokio::sync::Mutex::new(engine),
            provider,
            settings,
            in_flight: Mutex::new(None),
            latest_ticket: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Tags model requests with the chat owner.
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Answers a user message.
    ///
    /// Returns only after the reply has been recorded. A call that was
    /// superseded by a newer message returns its scenario reply with
    /// [`ReplySource::Superseded`](crate::domain::dialogue::ReplySource::Superseded).
    pub async fn send_message(
        &self,
        cmd: SendMessageCommand,
    ) -> Result<AssistantReply, SendMessageError> {
        let content = cmd.content.trim();
        if content.is_empty() {
            return Err(SendMessageError::EmptyContent);
        }
        if self.is_closed() {
            return Err(SendMessageError::SessionClosed);
        }

        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_in_flight();

        let mut engine = self.engine.lock().await;
        if self.is_closed() {
            return Err(SendMessageError::SessionClosed);
        }

        if !self.settings.use_model {
            return Ok(engine.handle_user_message(content).into());
        }

        let turn = engine.prepare_model_turn(content);
        let outcome = self.run_model_call(&turn, ticket).await;
        Ok(engine.complete_model_turn(turn, outcome))
    }

    async fn run_model_call(&self, turn: &ModelTurn, ticket: u64) -> ModelOutcome {
        if self.is_superseded(ticket) {
            return ModelOutcome::Superseded;
        }

        let request = self.build_request(turn);
        tracing::debug!(
            request_id = %turn.request_id,
            step = turn.step().label(),
            prompt_tokens = self.provider.estimate_tokens(&turn.system_prompt),
            messages = request.messages.len(),
            "requesting model reply"
        );

        let provider = Arc::clone(&self.provider);
        let limit = self.settings.timeout;
        let task =
            tokio::spawn(async move { tokio::time::timeout(limit, provider.complete(request)).await });
        *self.in_flight_slot() = Some(task.abort_handle());

        // A newer message may have arrived before the handle was stored.
        if self.is_superseded(ticket) {
            task.abort();
        }

        let outcome = match task.await {
            Ok(Ok(Ok(response))) => completed_outcome(response),
            Ok(Ok(Err(error))) => {
                if !error.is_retryable() {
                    tracing::error!(request_id = %turn.request_id, %error, "model call rejected");
                }
                ModelOutcome::Failed(error.to_string())
            }
            Ok(Err(_elapsed)) => ModelOutcome::Failed(AIError::timeout(limit.as_secs()).to_string()),
            Err(e) if e.is_cancelled() => ModelOutcome::Superseded,
            Err(e) => ModelOutcome::Failed(format!("model task failed: {}", e)),
        };

        self.in_flight_slot().take();
        outcome
    }

    fn build_request(&self, turn: &ModelTurn) -> CompletionRequest {
        let mut metadata = RequestMetadata::new(turn.request_id, turn.step());
        if let Some(user_id) = &self.user_id {
            metadata = metadata.with_user(user_id.clone());
        }

        let mut request = CompletionRequest::new(metadata)
            .with_system_prompt(turn.system_prompt.as_str())
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);
        if let Some(summary) = &turn.history.summary {
            request.messages.push(Message::system(summary.as_str()));
        }
        request
            .with_history(&turn.history.turns)
            .with_message(MessageRole::User, turn.user_message.as_str())
    }

    /// Clears history and returns to `Init`, binding `snapshot` if given.
    pub async fn reset(&self, snapshot: Option<UserProfileSnapshot>) {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst);
        self.abort_in_flight();
        self.engine.lock().await.reset(snapshot);
    }

    /// Binds a fresh snapshot without touching history.
    pub async fn rebind(&self, snapshot: UserProfileSnapshot) {
        self.engine.lock().await.rebind(snapshot);
    }

    pub async fn current_state(&self) -> DialogueStateView {
        self.engine.lock().await.current_state()
    }

    pub async fn welcome(&self, daily: Option<&DailyContext>) -> String {
        self.engine.lock().await.generate_welcome_message(daily)
    }

    pub async fn suggestion(&self) -> String {
        self.engine.lock().await.generate_interesting_suggestion()
    }

    /// Stops accepting messages and cancels any model call.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.abort_in_flight();
            tracing::info!(user_id = ?self.user_id, "assistant session closed");
        }
    }

    fn is_superseded(&self, ticket: u64) -> bool {
        self.is_closed() || self.latest_ticket.load(Ordering::SeqCst) != ticket
    }

    fn abort_in_flight(&self) {
        if let Some(handle) = self.in_flight_slot().take() {
            handle.abort();
        }
    }

    fn in_flight_slot(&self) -> MutexGuard<'_, Option<AbortHandle>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Only a reply that ended naturally is shown; a cut-off or filtered one
/// falls back to the scenario text.
fn completed_outcome(response: CompletionResponse) -> ModelOutcome {
    match response.finish_reason {
        FinishReason::Stop => ModelOutcome::Replied(response.content),
        FinishReason::Length => ModelOutcome::Failed("reply cut off at max_tokens".to_string()),
        FinishReason::ContentFilter => ModelOutcome::Failed("reply was content-filtered".to_string()),
        FinishReason::Error => ModelOutcome::Failed("provider reported an error".to_string()),
    }
}

impl<A: AIProvider + 'static> Drop for AssistantSession<A> {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
