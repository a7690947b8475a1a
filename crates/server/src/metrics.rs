//! Prometheus metrics
//!
//! The recorder is process-global: [`init_metrics`] installs it once and later
//! calls return the same handle. Recording before installation is a no-op.

use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder, returning its handle
///
/// Returns `None` (and logs) if another recorder already owns the process.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    match PROMETHEUS.get_or_try_init(|| PrometheusBuilder::new().install_recorder()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

/// Count a request to an endpoint
pub fn record_request(endpoint: &'static str) {
    metrics::counter!("lead_qualifier_requests_total", "endpoint" => endpoint).increment(1);
}

/// Count a chat reply by where it came from (`llm` or `local`)
pub fn record_chat_reply(source: &'static str) {
    metrics::counter!("lead_qualifier_chat_replies_total", "source" => source).increment(1);
}

/// Count a fall back from the LLM to the deterministic reply
pub fn record_llm_fallback(reason: &'static str) {
    metrics::counter!("lead_qualifier_llm_fallbacks_total", "reason" => reason).increment(1);
}

pub fn record_llm_latency(elapsed: Duration) {
    metrics::histogram!("lead_qualifier_llm_latency_seconds").record(elapsed.as_secs_f64());
}

/// Count a CRM delivery outcome
pub fn record_crm_delivery(status: &'static str) {
    metrics::counter!("lead_qualifier_crm_deliveries_total", "status" => status).increment(1);
}

/// `GET /metrics`
pub async fn metrics_handler() -> impl IntoResponse {
    match PROMETHEUS.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "metrics disabled\n".to_string(),
        ),
    }
}
