//! The analysis pipeline: validate, prompt, call upstream, clean, parse.

use crate::error::ProxyError;
use crate::models::{AnalysisRequest, AnalysisResult, OutputCheck};
use crate::services::fence::strip_code_fences;
use crate::services::metrics;
use crate::services::prompt::build_prompt;
use crate::services::providers::{GenerationParams, ProviderError, TextProvider};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct SentimentAnalyzer {
    /// `None` when no API key is configured.
    provider: Option<Arc<dyn TextProvider>>,
    params: GenerationParams,
}

impl SentimentAnalyzer {
    pub fn new(provider: Option<Arc<dyn TextProvider>>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    /// Run one analysis. The returned value is the model's JSON output,
    /// unmodified.
    pub async fn analyze(&self, body: &Value) -> Result<Value, ProxyError> {
        let request = AnalysisRequest::from_body(body)?;

        let provider = self.provider.as_ref().ok_or(ProxyError::Configuration)?;

        let prompt = build_prompt(&request.text, request.detail_analysis);

        let started = Instant::now();
        let response = provider.generate(&prompt, &self.params).await;
        metrics::record_upstream_latency(provider.model(), started.elapsed().as_secs_f64());

        let response = response.map_err(|e| {
            metrics::record_upstream_error(e.kind());
            match e {
                ProviderError::Upstream { status, body } => {
                    tracing::warn!(%status, "Gemini API returned an error");
                    ProxyError::Upstream { status, body }
                }
                other => {
                    tracing::error!(error = %other, "Gemini API call failed");
                    ProxyError::Internal(other.to_string())
                }
            }
        })?;

        tracing::debug!(
            model = provider.model(),
            detail = request.detail_analysis,
            prompt_tokens = response.prompt_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Gemini API responded"
        );

        let cleaned = strip_code_fences(&response.text);

        let output: Value = serde_json::from_str(&cleaned).map_err(|e| {
            tracing::error!(error = %e, raw_len = cleaned.len(), "Model output is not valid JSON");
            ProxyError::ResponseParse {
                raw: cleaned.clone(),
            }
        })?;

        let check = AnalysisResult::inspect(&output);
        metrics::record_analysis_output(check.label());
        match &check {
            OutputCheck::Conforming => {}
            OutputCheck::ScoreMismatch { counted, morphemes } => tracing::warn!(
                counted,
                morphemes,
                "Sentiment scores do not sum to the morpheme count"
            ),
            OutputCheck::NonConforming(reason) => tracing::warn!(
                reason = %reason,
                "Model output does not match the analysis schema; forwarding unchanged"
            ),
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EMPTY_TEXT_MESSAGE;
    use crate::services::providers::mock::MockTextProvider;
    use reqwest::StatusCode;
    use serde_json::json;

    fn analyzer(provider: &Arc<MockTextProvider>) -> SentimentAnalyzer {
        SentimentAnalyzer::new(
            Some(provider.clone() as Arc<dyn TextProvider>),
            GenerationParams::default(),
        )
    }

    #[tokio::test]
    async fn fenced_output_is_returned_unchanged() {
        let provider = Arc::new(MockTextProvider::replying(
            "```json\n{\"overall_sentiment\":\"positive\",\"extra\":[1,2]}\n```",
        ));

        let output = analyzer(&provider)
            .analyze(&json!({ "text": "행복해요" }))
            .await
            .unwrap();

        assert_eq!(output, json!({ "overall_sentiment": "positive", "extra": [1, 2] }));
    }

    #[tokio::test]
    async fn invalid_output_reports_cleaned_text() {
        let provider = Arc::new(MockTextProvider::replying("```json\n{oops\n```"));

        let err = analyzer(&provider)
            .analyze(&json!({ "text": "행복해요" }))
            .await
            .unwrap_err();

        match err {
            ProxyError::ResponseParse { raw } => assert_eq!(raw, "{oops"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_output_is_a_parse_error() {
        let provider = Arc::new(MockTextProvider::replying(""));

        let err = analyzer(&provider)
            .analyze(&json!({ "text": "행복해요" }))
            .await
            .unwrap_err();

        assert!(matches!(err, ProxyError::ResponseParse { raw } if raw.is_empty()));
    }

    #[tokio::test]
    async fn validation_runs_before_the_credential_check() {
        let analyzer = SentimentAnalyzer::new(None, GenerationParams::default());

        let err = analyzer.analyze(&json!({ "text": "  " })).await.unwrap_err();
        assert!(matches!(err, ProxyError::Validation(msg) if msg == EMPTY_TEXT_MESSAGE));

        let err = analyzer.analyze(&json!({ "text": "좋다" })).await.unwrap_err();
        assert!(matches!(err, ProxyError::Configuration));
    }

    #[tokio::test]
    async fn invalid_requests_never_reach_upstream() {
        let provider = Arc::new(MockTextProvider::replying("{}"));

        let _ = analyzer(&provider).analyze(&json!({ "text": "" })).await;
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn detail_flag_selects_the_prompt() {
        let provider = Arc::new(MockTextProvider::replying("{}"));
        let analyzer = analyzer(&provider);

        analyzer.analyze(&json!({ "text": "좋다" })).await.unwrap();
        analyzer
            .analyze(&json!({ "text": "좋다", "detailAnalysis": true }))
            .await
            .unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 2);
        assert_ne!(prompts[0], prompts[1]);
        assert!(prompts[1].contains("specific_emotion"));
    }

    #[tokio::test]
    async fn upstream_status_and_body_are_kept() {
        let provider = Arc::new(MockTextProvider::failing_with_status(
            StatusCode::FORBIDDEN,
            "{\"error\":{\"message\":\"API key not valid\"}}",
        ));

        let err = analyzer(&provider)
            .analyze(&json!({ "text": "좋다" }))
            .await
            .unwrap_err();

        match err {
            ProxyError::Upstream { status, body } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn transport_failures_become_internal_errors() {
        let provider = Arc::new(MockTextProvider::unreachable("connection refused"));

        let err = analyzer(&provider)
            .analyze(&json!({ "text": "좋다" }))
            .await
            .unwrap_err();

        assert!(matches!(err, ProxyError::Internal(msg) if msg.contains("connection refused")));
    }

    #[tokio::test]
    async fn non_conforming_output_is_still_forwarded() {
        let provider = Arc::new(MockTextProvider::replying("[1, \"two\"]"));

        let output = analyzer(&provider)
            .analyze(&json!({ "text": "좋다" }))
            .await
            .unwrap();

        assert_eq!(output, json!([1, "two"]));
    }
}
