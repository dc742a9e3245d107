//! Application startup and lifecycle management.
//!
//! One HTTP listener serves the proxy on every path. An optional second
//! listener serves Prometheus metrics, kept off the main listener so that
//! `GET` on any proxy path stays a plain liveness check.

use crate::config::SentimentConfig;
use crate::handlers::{dispatch, panic_response};
use crate::services::get_metrics;
use crate::services::providers::gemini::GeminiTextProvider;
use crate::services::providers::{GenerationParams, TextProvider};
use crate::services::SentimentAnalyzer;
use axum::{
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::cors::cors_middleware;
use service_core::middleware::tracing::{request_id, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: SentimentAnalyzer,
}

impl AppState {
    /// Wire the Gemini provider from configuration.
    pub fn from_config(config: &SentimentConfig) -> Result<Self, AppError> {
        let provider = GeminiTextProvider::from_settings(&config.gemini).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to create HTTP client: {}", e))
        })?;

        let provider: Option<Arc<dyn TextProvider>> = match provider {
            Some(p) => {
                tracing::info!(model = %config.gemini.model, "Initialized Gemini text provider");
                Some(Arc::new(p))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY is not set; analysis requests will fail");
                None
            }
        };

        let params = GenerationParams {
            temperature: config.gemini.temperature,
            max_output_tokens: config.gemini.max_output_tokens,
        };

        Ok(Self {
            analyzer: SentimentAnalyzer::new(provider, params),
        })
    }
}

/// Build the proxy router.
pub fn build_router(state: AppState) -> Router {
    with_layers(Router::new().fallback(dispatch).with_state(state))
}

/// Layers run outermost first: request id, trace, cross-origin headers,
/// panic catcher.
fn with_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(cors_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id(req),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
}

fn metrics_router() -> Router {
    Router::new().route("/metrics", get(|| async { get_metrics() }))
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    metrics_port: Option<u16>,
    http_listener: TcpListener,
    metrics_listener: Option<TcpListener>,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: SentimentConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;

        // Bind HTTP listener (port 0 = random port for testing)
        let http_addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", http_addr, e);
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        let (metrics_listener, metrics_port) = match config.common.metrics_port {
            Some(port) => {
                let addr = SocketAddr::from(([0, 0, 0, 0], port));
                let listener = TcpListener::bind(addr).await.map_err(|e| {
                    tracing::error!("Failed to bind metrics listener to {}: {}", addr, e);
                    AppError::from(e)
                })?;
                let port = listener.local_addr()?.port();
                (Some(listener), Some(port))
            }
            None => (None, None),
        };

        tracing::info!(
            http_port,
            metrics_port = ?metrics_port,
            "Sentiment service listeners bound"
        );

        Ok(Self {
            http_port,
            metrics_port,
            http_listener,
            metrics_listener,
            state,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Get the metrics port, if a metrics listener was configured.
    pub fn metrics_port(&self) -> Option<u16> {
        self.metrics_port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let http_server = axum::serve(self.http_listener, build_router(self.state));

        let Some(metrics_listener) = self.metrics_listener else {
            return http_server.await;
        };

        tokio::select! {
            result = http_server => {
                if let Err(e) = result {
                    tracing::error!("HTTP server error: {}", e);
                    return Err(e);
                }
            }
            result = axum::serve(metrics_listener, metrics_router()) => {
                if let Err(e) = result {
                    tracing::error!("Metrics server error: {}", e);
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}
