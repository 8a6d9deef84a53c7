//! Scripted AI provider for tests and demos.
//!
//! Replies are consumed from a queue in order. Each scripted reply can
//! carry its own latency, which lets tests hold one request in flight
//! while another arrives.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_reply("Начни с главы 4.")
//!     .with_delayed_reply("slow", Duration::from_secs(5))
//!     .with_error(MockError::Unavailable { message: "down".into() });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

const DEFAULT_REPLY: &str = "Mock response";

/// Scripted provider with call tracking.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    info: ProviderInfo,
    default_delay: Duration,
}

#[derive(Debug, Clone)]
struct ScriptedReply {
    outcome: Result<String, MockError>,
    delay: Option<Duration>,
    finish_reason: FinishReason,
}

/// Failures the mock can be scripted to return.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContextTooLong { tokens: u32, max: u32 },
    ContentFiltered { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContextTooLong { tokens, max } => AIError::context_too_long(tokens, max),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            info: ProviderInfo::new("mock", "mock-model-1", 8_000),
            default_delay: Duration::ZERO,
        }
    }

    /// Queues a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.push(Ok(content.into()), None, FinishReason::Stop)
    }

    /// Queues a successful reply that arrives after `delay`.
    pub fn with_delayed_reply(self, content: impl Into<String>, delay: Duration) -> Self {
        self.push(Ok(content.into()), Some(delay), FinishReason::Stop)
    }

    /// Queues a reply that stopped for `reason`, e.g. a cut-off at `max_tokens`.
    pub fn with_unfinished_reply(self, content: impl Into<String>, reason: FinishReason) -> Self {
        self.push(Ok(content.into()), None, reason)
    }

    /// Queues a failure.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(Err(error), None, FinishReason::Error)
    }

    /// Latency for replies queued without their own delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    fn push(
        self,
        outcome: Result<String, MockError>,
        delay: Option<Duration>,
        finish_reason: FinishReason,
    ) -> Self {
        lock(&self.script).push_back(ScriptedReply {
            outcome,
            delay,
            finish_reason,
        });
        self
    }

    /// Number of requests received, including cancelled ones.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    pub fn last_call(&self) -> Option<CompletionRequest> {
        lock(&self.calls).last().cloned()
    }

    fn next_reply(&self) -> ScriptedReply {
        lock(&self.script).pop_front().unwrap_or(ScriptedReply {
            outcome: Ok(DEFAULT_REPLY.to_string()),
            delay: None,
            finish_reason: FinishReason::Stop,
        })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let prompt_tokens = request
            .messages
            .iter()
            .map(|m| self.estimate_tokens(&m.content))
            .sum();
        lock(&self.calls).push(request);

        let reply = self.next_reply();
        let delay = reply.delay.unwrap_or(self.default_delay);
        if !delay.is_zero() {
            sleep(delay).await;
        }

        let content = reply.outcome?;
        let completion_tokens = self.estimate_tokens(&content);
        Ok(CompletionResponse {
            content,
            usage: TokenUsage::new(prompt_tokens, completion_tokens),
            model: self.info.model.clone(),
            finish_reason: reply.finish_reason,
        })
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        u32::try_from(text.chars().count() / 4).unwrap_or(u32::MAX).max(1)
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
