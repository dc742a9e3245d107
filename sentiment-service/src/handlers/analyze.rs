use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::any::Any;
use std::time::Instant;

use super::status::StatusResponse;
use crate::error::ErrorResponse;
use crate::services::metrics;
use crate::startup::AppState;

/// Single entry point for every path and method.
///
/// A body that cannot be buffered (for example one over the size limit) is
/// not an error here; only POST looks at the body, and it treats a missing
/// body as `{}`.
#[tracing::instrument(skip(state, body))]
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let started = Instant::now();

    let response = match method {
        Method::OPTIONS => StatusCode::NO_CONTENT.into_response(),
        Method::GET => (StatusCode::OK, Json(StatusResponse::running())).into_response(),
        Method::POST => {
            let body = body.unwrap_or_else(|rejection| {
                tracing::info!(error = %rejection, "Request body unreadable; treating as empty");
                Bytes::new()
            });
            analyze(&state, &body).await
        }
        _ => (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response(),
    };

    metrics::record_http_request(
        method.as_str(),
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );

    response
}

async fn analyze(state: &AppState, body: &[u8]) -> Response {
    // An unreadable body is treated as `{}`.
    let body: Value =
        serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Default::default()));

    match state.analyzer.analyze(&body).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::info!(kind = e.kind(), status = %e.status(), "Analysis request failed");
            e.into_response()
        }
    }
}

/// Render a handler panic as the generic internal error body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    tracing::error!(details = %details, "Handler panicked");

    let body = serde_json::to_string(&ErrorResponse::internal(details))
        .unwrap_or_else(|_| "{\"error\":\"internal error\"}".to_string());

    axum::http::Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_become_json_details() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }
}
