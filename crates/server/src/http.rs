//! HTTP Endpoints
//!
//! REST API for lead intake:
//! - `POST /chat`: reply for the current turn of a conversation
//! - `POST /extract`: structured, scored lead for a transcript, forwarded to the CRM
//! - `GET /health`, `GET /metrics`

use std::time::{Duration, Instant};

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use lead_qualifier_core::ChatMessage;
use lead_qualifier_llm::{accept_reply, build_messages, LlmBackend, LlmError};
use lead_qualifier_tools::{CrmLeadPayload, DeliveryStatus};

use crate::metrics::{
    metrics_handler, record_chat_reply, record_crm_delivery, record_llm_fallback,
    record_llm_latency, record_request,
};
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.timeout_seconds);

    Router::new()
        .route("/chat", post(chat))
        .route("/extract", post(extract))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(cors_layer),
        )
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, allows any origin without credentials
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        if !origins.is_empty() {
            tracing::error!("All configured CORS origins are invalid, allowing any origin");
        }
        return base.allow_origin(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    base.allow_origin(parsed_origins)
}

// ============================================================================
// Chat
// ============================================================================

/// Chat request: the full history, resent every turn
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Client-provided id grouping a conversation
    pub thread_id: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Why an LLM reply was not used
#[derive(Debug)]
enum LlmFallback {
    Failed(LlmError),
    TooShort,
}

impl LlmFallback {
    fn reason(&self) -> &'static str {
        match self {
            LlmFallback::Failed(LlmError::Api(_)) => "api",
            LlmFallback::Failed(LlmError::Network(_)) => "network",
            LlmFallback::Failed(LlmError::InvalidResponse(_)) => "invalid_response",
            LlmFallback::Failed(LlmError::Timeout) => "timeout",
            LlmFallback::Failed(LlmError::Configuration(_)) => "configuration",
            LlmFallback::TooShort => "short_reply",
        }
    }
}

async fn llm_reply(llm: &dyn LlmBackend, history: &[ChatMessage]) -> Result<String, LlmFallback> {
    let start = Instant::now();
    let result = llm.generate(&build_messages(history)).await;
    record_llm_latency(start.elapsed());

    let generated = result.map_err(LlmFallback::Failed)?;
    tracing::debug!(
        tokens = generated.tokens,
        total_time_ms = generated.total_time_ms,
        finish_reason = ?generated.finish_reason,
        "LLM reply generated"
    );
    accept_reply(&generated.text).ok_or(LlmFallback::TooShort)
}

/// Chat endpoint
///
/// The deterministic reply is computed first and returned whenever the LLM
/// is absent, fails, or answers with next to nothing.
async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<ChatResponse> {
    record_request("chat");

    let local = state.qualifier.turn_reply(&request.messages);

    let reply = match state.llm.as_deref() {
        None => {
            record_chat_reply("local");
            local
        }
        Some(llm) => match llm_reply(llm, &request.messages).await {
            Ok(reply) => {
                record_chat_reply("llm");
                reply
            }
            Err(fallback) => {
                tracing::warn!(
                    thread_id = %request.thread_id,
                    model = llm.model_name(),
                    reason = fallback.reason(),
                    detail = ?fallback,
                    "LLM reply unavailable, using deterministic reply"
                );
                record_llm_fallback(fallback.reason());
                record_chat_reply("local");
                local
            }
        },
    };

    tracing::debug!(
        thread_id = %request.thread_id,
        turns = request.messages.len(),
        "Chat turn answered"
    );

    Json(ChatResponse { reply })
}

// ============================================================================
// Extract
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub transcript: String,
}

/// CRM-friendly lead fields plus the delivery outcome
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    #[serde(flatten)]
    pub lead: CrmLeadPayload,
    pub crm_status: DeliveryStatus,
    pub crm_note: String,
}

/// Extract endpoint
async fn extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Json<ExtractResponse> {
    record_request("extract");

    let lead = state.qualifier.structured_lead(&request.transcript);
    let report = state.crm.deliver(&lead).await;
    record_crm_delivery(report.status.as_str());

    tracing::info!(
        score = lead.score,
        crm = state.crm.name(),
        crm_status = report.status.as_str(),
        "Lead extracted"
    );

    Json(ExtractResponse {
        lead: CrmLeadPayload::from(&lead),
        crm_status: report.status,
        crm_note: report.note,
    })
}

// ============================================================================
// Health
// ============================================================================

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "llm": state.llm.as_ref().map(|llm| llm.model_name().to_string()),
            "field_memory": state.qualifier.field_memory(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_qualifier_config::Settings;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Settings::default()).unwrap().with_llm(None);
        let _ = create_router(state);
    }

    #[test]
    fn test_cors_layer_variants() {
        let _ = build_cors_layer(&[], false);
        let _ = build_cors_layer(&[], true);
        let _ = build_cors_layer(&["https://quotes.example.com".to_string()], true);
        let _ = build_cors_layer(&["bad\norigin".to_string()], true);
    }

    #[test]
    fn test_fallback_reasons() {
        assert_eq!(LlmFallback::Failed(LlmError::Timeout).reason(), "timeout");
        assert_eq!(
            LlmFallback::Failed(LlmError::Api("HTTP 429".into())).reason(),
            "api"
        );
        assert_eq!(LlmFallback::TooShort.reason(), "short_reply");
    }

    #[test]
    fn test_chat_request_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"thread_id": "t1"}"#).unwrap();
        assert!(request.messages.is_empty());

        let request: ExtractRequest = serde_json::from_str("{}").unwrap();
        assert!(request.transcript.is_empty());
    }
}
