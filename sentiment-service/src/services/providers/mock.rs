//! Mock provider for testing.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Mutex;

enum Reply {
    Text(String),
    Upstream(StatusCode, String),
    Network(String),
}

/// Replays one canned reply and records every prompt it receives.
pub struct MockTextProvider {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(Reply::Text(text.into()))
    }

    pub fn failing_with_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(Reply::Upstream(status, body.into()))
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(Reply::Network(message.into()))
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.reply {
            Reply::Text(text) => Ok(ProviderResponse {
                text: text.clone(),
                prompt_tokens: prompt.chars().count() as u32 / 4,
                output_tokens: text.chars().count() as u32 / 4,
                finish_reason: FinishReason::Complete,
            }),
            Reply::Upstream(status, body) => Err(ProviderError::Upstream {
                status: *status,
                body: body.clone(),
            }),
            Reply::Network(message) => Err(ProviderError::Network(message.clone())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
