//! Analysis request and result models.
//!
//! The request side is validated strictly. The result side describes the
//! shape the model is asked to produce; responses are forwarded as-is and
//! these types are only used to report drift from that shape.

use crate::error::{ProxyError, EMPTY_TEXT_MESSAGE, TEXT_NOT_STRING_MESSAGE, TEXT_TOO_LONG_MESSAGE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Longest accepted input, in characters.
pub const MAX_TEXT_CHARS: usize = 100;

/// A validated analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub text: String,
    pub detail_analysis: bool,
}

impl AnalysisRequest {
    /// Validate a decoded request body.
    ///
    /// Anything that is not a JSON object is treated as an empty object.
    pub fn from_body(body: &Value) -> Result<Self, ProxyError> {
        let text = match body.get("text") {
            None => return Err(ProxyError::Validation(EMPTY_TEXT_MESSAGE)),
            Some(value) if !is_truthy(value) => {
                return Err(ProxyError::Validation(EMPTY_TEXT_MESSAGE))
            }
            Some(Value::String(text)) => text,
            Some(_) => return Err(ProxyError::Validation(TEXT_NOT_STRING_MESSAGE)),
        };

        if trim_text(text).is_empty() {
            return Err(ProxyError::Validation(EMPTY_TEXT_MESSAGE));
        }

        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(ProxyError::Validation(TEXT_TOO_LONG_MESSAGE));
        }

        let detail_analysis = body.get("detailAnalysis").is_some_and(is_truthy);

        Ok(Self {
            text: text.clone(),
            detail_analysis,
        })
    }
}

/// Whitespace trim that also drops a byte-order mark.
fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Loose truthiness for flags sent by browser clients.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Fine-grained emotion tags used in detail mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    #[serde(rename = "기쁨")]
    Joy,
    #[serde(rename = "슬픔")]
    Sadness,
    #[serde(rename = "분노")]
    Anger,
    #[serde(rename = "놀람")]
    Surprise,
    #[serde(rename = "두려움")]
    Fear,
    #[serde(rename = "혐오")]
    Disgust,
    #[serde(rename = "중립")]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphemeEntry {
    pub word: String,
    #[serde(rename = "pos")]
    pub part_of_speech: String,
    pub sentiment: Sentiment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_emotion: Option<Emotion>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentScores {
    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub morphemes: Vec<MorphemeEntry>,
    pub overall_sentiment: Sentiment,
    pub sentiment_scores: SentimentScores,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_emotion_scores: Option<HashMap<Emotion, u32>>,
}

/// How well a model output matches [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCheck {
    Conforming,
    /// Well-formed, but the score counts do not add up to the morpheme count.
    ScoreMismatch { counted: u32, morphemes: usize },
    NonConforming(String),
}

impl OutputCheck {
    pub fn label(&self) -> &'static str {
        match self {
            OutputCheck::Conforming => "conforming",
            OutputCheck::ScoreMismatch { .. } => "score_mismatch",
            OutputCheck::NonConforming(_) => "non_conforming",
        }
    }
}

impl AnalysisResult {
    /// Classify a parsed model output without altering it.
    pub fn inspect(output: &Value) -> OutputCheck {
        let result = match Self::deserialize(output) {
            Ok(result) => result,
            Err(e) => return OutputCheck::NonConforming(e.to_string()),
        };

        let counted = result.sentiment_scores.total();
        if counted as usize != result.morphemes.len() {
            return OutputCheck::ScoreMismatch {
                counted,
                morphemes: result.morphemes.len(),
            };
        }

        OutputCheck::Conforming
    }
}
