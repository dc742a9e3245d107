//! Common test utilities for sentiment-service integration tests.
#![allow(dead_code)]

use sentiment_service::config::{GeminiSettings, SentimentConfig};
use sentiment_service::startup::Application;
use service_core::config::Config as CommonConfig;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

pub const TEST_API_KEY: &str = "test-api-key";

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,sentiment_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Test configuration pointing the Gemini client at `api_base`.
pub fn test_config(api_key: Option<&str>, api_base: &str) -> SentimentConfig {
    SentimentConfig {
        common: CommonConfig {
            port: 0,
            metrics_port: None,
        },
        service_name: "sentiment-service-test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        gemini: GeminiSettings::new(api_key, api_base),
    }
}

/// Test application wrapper.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn post_json(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(&self.address)
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Spawn the application with `config` on a random port.
pub async fn spawn_app_with(config: SentimentConfig) -> TestApp {
    init_tracing();

    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.http_port();

    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build client");

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client,
    }
}

/// Spawn the application against an upstream at `api_base`, with a key set.
pub async fn spawn_app(api_base: &str) -> TestApp {
    spawn_app_with(test_config(Some(TEST_API_KEY), api_base)).await
}
