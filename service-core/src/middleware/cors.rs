//! Origin-echo cross-origin headers.
//!
//! Every response, whatever the handler returned, gets the same header set:
//! the caller's `Origin` echoed verbatim (or `*` when absent) plus fixed
//! method, header and max-age values. Any origin is accepted; this is a
//! browser accommodation, not an access check.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::{extract::Request, middleware::Next, response::Response};

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
pub const MAX_AGE_SECONDS: &str = "86400";

/// Headers for one request, derived from its `Origin`.
pub fn cors_headers(request_headers: &HeaderMap) -> HeaderMap {
    let origin = request_headers
        .get(header::ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE_SECONDS),
    );
    headers
}

pub async fn cors_middleware(req: Request, next: Next) -> Response {
    let cors = cors_headers(req.headers());

    let mut response = next.run(req).await;
    response.headers_mut().extend(cors);

    response
}
