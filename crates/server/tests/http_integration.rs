//! HTTP-level integration tests for the lead qualifier router.
//!
//! The LLM and CRM collaborators are replaced by in-process stubs, so these
//! tests need no network access.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use tower::ServiceExt;

use lead_qualifier_config::{FieldMemory, Settings};
use lead_qualifier_core::ScoredLead;
use lead_qualifier_llm::{FinishReason, GenerationResult, LlmBackend, LlmError, Message};
use lead_qualifier_server::{create_router, init_metrics, AppState};
use lead_qualifier_tools::{CrmIntegration, DeliveryReport, StubCrmIntegration};

const COVERAGE_QUESTION: &str =
    "What kind of insurance do you need (life, auto, home, renters, health, or business)?";

// ── Stubs ───────────────────────────────────────────────────────

enum StubReply {
    Text(&'static str),
    Fail,
}

struct StubLlm {
    reply: StubReply,
}

#[async_trait]
impl LlmBackend for StubLlm {
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
        assert!(!messages.is_empty(), "system prompt must always be sent");
        match self.reply {
            StubReply::Text(text) => Ok(GenerationResult {
                text: text.to_string(),
                tokens: 5,
                total_time_ms: 1,
                finish_reason: FinishReason::Stop,
            }),
            StubReply::Fail => Err(LlmError::Api("HTTP 429 Too Many Requests".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

// ── Test app builder ───────────────────────────────────────────

fn settings(memory: FieldMemory) -> Settings {
    let mut settings = Settings::default();
    settings.llm.api_key = String::new();
    settings.crm.webhook_url = String::new();
    settings.agent.field_memory = memory;
    settings
}

fn build_test_app(llm: Option<StubReply>, crm: Arc<dyn CrmIntegration>) -> axum::Router {
    let llm = llm.map(|reply| Arc::new(StubLlm { reply }) as Arc<dyn LlmBackend>);
    let state = AppState::new(settings(FieldMemory::Reset))
        .unwrap()
        .with_llm(llm)
        .with_crm(crm);
    create_router(state)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(
        |_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
    )
}

async fn chat_reply(app: axum::Router, messages: serde_json::Value) -> String {
    let resp = app
        .oneshot(post_json(
            "/chat",
            serde_json::json!({ "thread_id": "t-1", "messages": messages }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["reply"].as_str().unwrap().to_string()
}

// ── Tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let app = build_test_app(None, Arc::new(StubCrmIntegration::default()));
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["llm"], serde_json::Value::Null);
    assert_eq!(body["field_memory"], "reset");
}

#[tokio::test]
async fn test_chat_empty_history_asks_coverage() {
    let app = build_test_app(None, Arc::new(StubCrmIntegration::default()));
    let reply = chat_reply(app, serde_json::json!([])).await;
    assert_eq!(reply, COVERAGE_QUESTION);
}

#[tokio::test]
async fn test_chat_deterministic_reply() {
    let app = build_test_app(None, Arc::new(StubCrmIntegration::default()));
    let reply = chat_reply(
        app,
        serde_json::json!([{ "role": "user", "content": "I need auto insurance" }]),
    )
    .await;
    assert_eq!(
        reply,
        "Got it (coverage=auto). Which U.S. state are you in? (2–letter code like CA or TX)"
    );
}

#[tokio::test]
async fn test_chat_prefers_llm_reply() {
    let app = build_test_app(
        Some(StubReply::Text("  Great, which state do you live in?  ")),
        Arc::new(StubCrmIntegration::default()),
    );
    let reply = chat_reply(
        app,
        serde_json::json!([{ "role": "user", "content": "I need auto insurance" }]),
    )
    .await;
    assert_eq!(reply, "Great, which state do you live in?");
}

#[tokio::test]
async fn test_chat_falls_back_on_short_llm_reply() {
    let app = build_test_app(
        Some(StubReply::Text("ok")),
        Arc::new(StubCrmIntegration::default()),
    );
    let reply = chat_reply(app, serde_json::json!([])).await;
    assert_eq!(reply, COVERAGE_QUESTION);
}

#[tokio::test]
async fn test_chat_falls_back_on_llm_error() {
    let app = build_test_app(Some(StubReply::Fail), Arc::new(StubCrmIntegration::default()));
    let reply = chat_reply(
        app,
        serde_json::json!([
            { "role": "user", "content": "I'm in TX" },
            { "role": "assistant", "content": COVERAGE_QUESTION },
            { "role": "user", "content": "life insurance" }
        ]),
    )
    .await;
    assert_eq!(
        reply,
        "Got it (coverage=life). Which U.S. state are you in? (2–letter code like CA or TX)"
    );
}

#[tokio::test]
async fn test_chat_accumulates_when_configured() {
    let state = AppState::new(settings(FieldMemory::Accumulate))
        .unwrap()
        .with_llm(None)
        .with_crm(Arc::new(StubCrmIntegration::default()));
    let reply = chat_reply(
        create_router(state),
        serde_json::json!([
            { "role": "user", "content": "I'm in TX" },
            { "role": "assistant", "content": COVERAGE_QUESTION },
            { "role": "user", "content": "life insurance" }
        ]),
    )
    .await;
    assert_eq!(reply, "Got it (coverage=life, state=TX). What is your age?");
}

#[tokio::test]
async fn test_chat_rejects_missing_thread_id() {
    let app = build_test_app(None, Arc::new(StubCrmIntegration::default()));
    let resp = app
        .oneshot(post_json("/chat", serde_json::json!({ "messages": [] })))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_extract_maps_fields_and_reports_crm() {
    let crm = Arc::new(StubCrmIntegration::new(DeliveryReport::sent("201")));
    let app = build_test_app(None, crm.clone());

    let resp = app
        .oneshot(post_json(
            "/extract",
            serde_json::json!({
                "transcript": "Hi, my name is Dana Reyes. I need life insurance in CA. I'm 29. \
                               $120/month, urgency 4. Provider is Acme."
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["customer_name"], "Dana Reyes");
    assert_eq!(body["customer_age"], 29);
    assert_eq!(body["state_code"], "CA");
    assert_eq!(body["insurance_type"], "life");
    assert_eq!(body["current_provider"], "Acme");
    assert_eq!(body["monthly_budget"], 120.0);
    assert_eq!(body["priority_level"], 4);
    assert_eq!(body["lead_score"], 7);
    assert_eq!(body["crm_status"], "sent");
    assert_eq!(body["crm_note"], "201");
    assert_eq!(crm.calls(), 1);
}

#[tokio::test]
async fn test_extract_without_webhook_is_skipped() {
    let state = AppState::new(settings(FieldMemory::Reset)).unwrap().with_llm(None);
    let app = create_router(state);

    let resp = app
        .oneshot(post_json("/extract", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["insurance_type"], serde_json::Value::Null);
    assert_eq!(body["lead_score"], 0);
    assert_eq!(body["crm_status"], "skipped");
    assert_eq!(body["crm_note"], "No CRM_WEBHOOK_URL set");
}

#[tokio::test]
async fn test_crm_error_does_not_change_lead() {
    struct FailingCrm;

    #[async_trait]
    impl CrmIntegration for FailingCrm {
        async fn deliver(&self, _lead: &ScoredLead) -> DeliveryReport {
            DeliveryReport::error("status=500 body=boom")
        }
    }

    let app = build_test_app(None, Arc::new(FailingCrm));
    let resp = app
        .oneshot(post_json(
            "/extract",
            serde_json::json!({ "transcript": "auto insurance, state: NV" }),
        ))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["insurance_type"], "auto");
    assert_eq!(body["state_code"], "NV");
    assert_eq!(body["lead_score"], 2);
    assert_eq!(body["crm_status"], "error");
    assert_eq!(body["crm_note"], "status=500 body=boom");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    assert!(init_metrics().is_some());

    let app = build_test_app(None, Arc::new(StubCrmIntegration::default()));
    chat_reply(app.clone(), serde_json::json!([])).await;

    let resp = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("lead_qualifier_requests_total"), "{text}");
}
