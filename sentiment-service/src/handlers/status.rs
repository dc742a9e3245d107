use serde::Serialize;

pub const STATUS_MESSAGE: &str = "Jaccard sentiment analysis service is active.";
pub const USAGE_HINT: &str =
    "Send a POST request with { \"text\": \"your text\" } to analyze sentiment.";

/// Liveness payload served for GET.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub usage: &'static str,
    pub version: &'static str,
}

impl StatusResponse {
    pub fn running() -> Self {
        Self {
            status: "running",
            message: STATUS_MESSAGE,
            usage: USAGE_HINT,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
