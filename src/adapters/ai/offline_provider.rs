//! Provider used when no language model is configured.

use async_trait::async_trait;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Always reports itself unavailable, so every turn takes the scenario reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAIProvider;

impl OfflineAIProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AIProvider for OfflineAIProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        Err(AIError::unavailable("no language model configured"))
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        u32::try_from(text.chars().count() / 4).unwrap_or(u32::MAX)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("offline", "none", 0)
    }
}
