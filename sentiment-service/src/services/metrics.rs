//! Prometheus metrics for sentiment-service.
//!
//! Recording helpers are no-ops until [`init_metrics`] has run, so library
//! code and tests can call them unconditionally.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    upstream_latency_seconds: HistogramVec,
    upstream_errors_total: IntCounterVec,
    analysis_outputs_total: IntCounterVec,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Register all metrics. Safe to call more than once.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if METRICS.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    let http_requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "status"],
    )?;

    let http_request_duration_seconds = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["method"],
    )?;

    let upstream_latency_seconds = HistogramVec::new(
        HistogramOpts::new(
            "upstream_latency_seconds",
            "Generative API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
        &["model"],
    )?;

    let upstream_errors_total = IntCounterVec::new(
        Opts::new("upstream_errors_total", "Total generative API errors"),
        &["error_type"],
    )?;

    let analysis_outputs_total = IntCounterVec::new(
        Opts::new(
            "analysis_outputs_total",
            "Parsed model outputs by schema check result",
        ),
        &["check"],
    )?;

    registry.register(Box::new(http_requests_total.clone()))?;
    registry.register(Box::new(http_request_duration_seconds.clone()))?;
    registry.register(Box::new(upstream_latency_seconds.clone()))?;
    registry.register(Box::new(upstream_errors_total.clone()))?;
    registry.register(Box::new(analysis_outputs_total.clone()))?;

    // A concurrent caller may have won the race; either registry is fine.
    let _ = METRICS.set(Metrics {
        registry,
        http_requests_total,
        http_request_duration_seconds,
        upstream_latency_seconds,
        upstream_errors_total,
        analysis_outputs_total,
    });

    Ok(())
}

/// Render all metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let Some(metrics) = METRICS.get() else {
        return "# Metrics not initialized\n".to_string();
    };

    let encoder = TextEncoder::new();
    let metric_families = metrics.registry.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record a completed HTTP request.
pub fn record_http_request(method: &str, status: u16, duration_secs: f64) {
    if let Some(m) = METRICS.get() {
        let status = status.to_string();
        m.http_requests_total
            .with_label_values(&[method, status.as_str()])
            .inc();
        m.http_request_duration_seconds
            .with_label_values(&[method])
            .observe(duration_secs);
    }
}

/// Record generative API latency.
pub fn record_upstream_latency(model: &str, duration_secs: f64) {
    if let Some(m) = METRICS.get() {
        m.upstream_latency_seconds
            .with_label_values(&[model])
            .observe(duration_secs);
    }
}

/// Record a generative API error.
pub fn record_upstream_error(error_type: &str) {
    if let Some(m) = METRICS.get() {
        m.upstream_errors_total.with_label_values(&[error_type]).inc();
    }
}

/// Record the schema check result of a parsed model output.
pub fn record_analysis_output(check: &str) {
    if let Some(m) = METRICS.get() {
        m.analysis_outputs_total.with_label_values(&[check]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent_and_renders_recorded_values() {
        init_metrics().unwrap();
        init_metrics().unwrap();

        record_http_request("POST", 200, 0.2);
        record_upstream_error("network");
        record_analysis_output("conforming");

        let rendered = get_metrics();
        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains("upstream_errors_total{error_type=\"network\"}"));
        assert!(rendered.contains("analysis_outputs_total{check=\"conforming\"}"));
    }
}
