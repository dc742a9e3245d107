//! Text generation provider abstraction.
//!
//! The analyzer only needs "prompt in, text out"; the trait keeps the Gemini
//! client swappable for the in-memory mock used in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::{DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Non-2xx reply; status and body are kept verbatim for the caller.
    #[error("Upstream error {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response envelope: {0}")]
    InvalidEnvelope(String),
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Upstream { .. } => "upstream_status",
            ProviderError::Network(_) => "network",
            ProviderError::InvalidEnvelope(_) => "invalid_envelope",
        }
    }
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Other,
    Unknown,
}

impl FinishReason {
    pub fn from_api(reason: Option<&str>) -> Self {
        match reason {
            Some("STOP") => FinishReason::Complete,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") => FinishReason::ContentFilter,
            Some(_) => FinishReason::Other,
            None => FinishReason::Unknown,
        }
    }
}

/// Result of a successful generation call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Generated text; empty when the envelope carried none.
    pub text: String,

    pub prompt_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: FinishReason,
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Submit one prompt and wait for the complete reply.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Model name, for logs and metric labels.
    fn model(&self) -> &str;
}
