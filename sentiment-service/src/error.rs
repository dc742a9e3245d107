//! Request-level error taxonomy and its HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const EMPTY_TEXT_MESSAGE: &str = "텍스트를 입력해주세요";
pub const TEXT_TOO_LONG_MESSAGE: &str = "문장이 너무 깁니다. 100글자 이내로 입력해주세요.";
pub const TEXT_NOT_STRING_MESSAGE: &str = "text 필드는 문자열이어야 합니다";
pub const MISSING_API_KEY_MESSAGE: &str = "GEMINI_API_KEY 환경 변수가 설정되지 않았습니다.";
pub const UPSTREAM_FAILED_MESSAGE: &str = "Gemini API 호출 실패";
pub const RESPONSE_PARSE_MESSAGE: &str = "AI 응답 데이터 분석 실패";
pub const INTERNAL_ERROR_MESSAGE: &str = "서비스 실행 중 오류 발생";

/// Every way a POST can fail. All variants are terminal for the request.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Validation error: {0}")]
    Validation(&'static str),

    #[error("Gemini API key is not configured")]
    Configuration,

    #[error("Upstream returned {status}")]
    Upstream { status: StatusCode, body: String },

    #[error("Model output is not valid JSON")]
    ResponseParse { raw: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::Configuration
            | ProxyError::ResponseParse { .. }
            | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Validation(_) => "validation",
            ProxyError::Configuration => "configuration",
            ProxyError::Upstream { .. } => "upstream",
            ProxyError::ResponseParse { .. } => "response_parse",
            ProxyError::Internal(_) => "internal",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ErrorResponse {
    pub fn internal(details: impl Into<String>) -> Self {
        Self {
            error: INTERNAL_ERROR_MESSAGE.to_string(),
            details: Some(details.into()),
            raw: None,
        }
    }
}

impl From<ProxyError> for ErrorResponse {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::Validation(message) => ErrorResponse {
                error: message.to_string(),
                details: None,
                raw: None,
            },
            ProxyError::Configuration => ErrorResponse {
                error: MISSING_API_KEY_MESSAGE.to_string(),
                details: None,
                raw: None,
            },
            ProxyError::Upstream { body, .. } => ErrorResponse {
                error: UPSTREAM_FAILED_MESSAGE.to_string(),
                details: Some(body),
                raw: None,
            },
            ProxyError::ResponseParse { raw } => ErrorResponse {
                error: RESPONSE_PARSE_MESSAGE.to_string(),
                details: None,
                raw: Some(raw),
            },
            ProxyError::Internal(message) => ErrorResponse::internal(message),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_passed_through() {
        let err = ProxyError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "quota".to_string(),
        };
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);

        let body = serde_json::to_value(ErrorResponse::from(err)).unwrap();
        assert_eq!(body["error"], UPSTREAM_FAILED_MESSAGE);
        assert_eq!(body["details"], "quota");
        assert!(body.get("raw").is_none());
    }

    #[test]
    fn parse_errors_carry_raw_text_only() {
        let err = ProxyError::ResponseParse {
            raw: "{not json".to_string(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::to_value(ErrorResponse::from(err)).unwrap();
        assert_eq!(body["raw"], "{not json");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn validation_errors_are_bad_requests_without_diagnostics() {
        let err = ProxyError::Validation(EMPTY_TEXT_MESSAGE);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let body = serde_json::to_value(ErrorResponse::from(err)).unwrap();
        assert_eq!(body, serde_json::json!({ "error": EMPTY_TEXT_MESSAGE }));
    }
}
