//! Gemini `generateContent` client.

use super::{
    FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider,
};
use crate::config::GeminiSettings;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Gemini text provider.
pub struct GeminiTextProvider {
    api_key: Secret<String>,
    api_base: String,
    model: String,
    client: Client,
}

impl GeminiTextProvider {
    /// Build a provider from settings. Returns `None` when no API key is
    /// configured.
    pub fn from_settings(settings: &GeminiSettings) -> Result<Option<Self>, reqwest::Error> {
        let Some(api_key) = settings.api_key.clone() else {
            return Ok(None);
        };

        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Some(Self {
            api_key,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            client: builder.build()?,
        }))
    }

    /// Build the API URL for the given method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.api_base,
            self.model,
            method,
            self.api_key.expose_secret()
        )
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
            },
        };

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        %status,
                        error = %e.without_url(),
                        "Failed to read Gemini API error body"
                    );
                    String::new()
                }
            };
            return Err(ProviderError::Upstream { status, body });
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidEnvelope(e.without_url().to_string()))?;

        Ok(parse_envelope(&envelope))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Read the reply envelope leniently: any missing, `null` or mistyped level
/// yields empty text (or zero usage) instead of an error.
fn parse_envelope(envelope: &Value) -> ProviderResponse {
    let text = envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let finish_reason = FinishReason::from_api(
        envelope
            .pointer("/candidates/0/finishReason")
            .and_then(Value::as_str),
    );

    let token_count = |field: &str| {
        envelope
            .pointer(&format!("/usageMetadata/{}", field))
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    };

    ProviderResponse {
        text,
        prompt_tokens: token_count("promptTokenCount"),
        output_tokens: token_count("candidatesTokenCount"),
        finish_reason,
    }
}
