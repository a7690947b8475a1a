//! External System Integrations
//!
//! CRM delivery of scored leads. Delivery never fails from the caller's point
//! of view: every outcome, including transport errors, is folded into a
//! [`DeliveryReport`] that is returned alongside the lead.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lead_qualifier_config::CrmConfig;
use lead_qualifier_core::{Coverage, ScoredLead};

/// `source` field of every webhook payload
pub const LEAD_SOURCE: &str = "insurance-lead-qualifier";

/// Longest response body excerpt kept in an error note
const BODY_EXCERPT_CHARS: usize = 200;

/// Integration errors for a single delivery attempt
#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for IntegrationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IntegrationError::Timeout(err.to_string())
        } else if err.is_builder() {
            IntegrationError::InvalidRequest(err.to_string())
        } else {
            IntegrationError::ConnectionFailed(err.to_string())
        }
    }
}

// ============================================================================
// Delivery outcome
// ============================================================================

/// Delivery status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Skipped,
    Error,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Skipped => "skipped",
            DeliveryStatus::Error => "error",
        }
    }
}

/// Outcome of one delivery, with a short diagnostic note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub status: DeliveryStatus,
    pub note: String,
}

impl DeliveryReport {
    pub fn sent(note: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Sent,
            note: note.into(),
        }
    }

    pub fn skipped(note: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Skipped,
            note: note.into(),
        }
    }

    pub fn error(note: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Error,
            note: note.into(),
        }
    }
}

// ============================================================================
// CRM Integration
// ============================================================================

/// CRM-friendly view of a scored lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmLeadPayload {
    pub customer_name: Option<String>,
    pub customer_age: Option<u32>,
    pub state_code: Option<String>,
    pub insurance_type: Option<Coverage>,
    pub current_provider: Option<String>,
    pub monthly_budget: Option<f64>,
    pub priority_level: Option<u32>,
    pub lead_score: u8,
}

impl From<&ScoredLead> for CrmLeadPayload {
    fn from(lead: &ScoredLead) -> Self {
        let record = &lead.record;
        Self {
            customer_name: record.name.clone(),
            customer_age: record.age.map(|a| a.value()),
            state_code: record.state.map(|s| s.as_str().to_string()),
            insurance_type: record.coverage,
            current_provider: record.provider.clone(),
            monthly_budget: record.budget.map(|b| b.dollars()),
            priority_level: record.urgency.map(|u| u.value()),
            lead_score: lead.score,
        }
    }
}

/// Body posted to the webhook
#[derive(Debug, Serialize)]
pub struct WebhookEnvelope<'a> {
    pub source: &'static str,
    /// RFC 3339 UTC with a `Z` suffix
    pub timestamp: String,
    pub lead: &'a ScoredLead,
}

impl<'a> WebhookEnvelope<'a> {
    pub fn new(lead: &'a ScoredLead) -> Self {
        Self {
            source: LEAD_SOURCE,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            lead,
        }
    }
}

/// CRM integration trait
///
/// Implementations report failure through [`DeliveryReport`] instead of an
/// error so a CRM outage can never affect the lead returned to the caller.
#[async_trait]
pub trait CrmIntegration: Send + Sync {
    /// Deliver a finished lead
    async fn deliver(&self, lead: &ScoredLead) -> DeliveryReport;

    /// Integration name for logs
    fn name(&self) -> &str {
        "crm"
    }
}

/// Webhook CRM
///
/// POSTs a [`WebhookEnvelope`] as JSON. Transport failures are retried up to
/// `max_attempts` times with a fixed `backoff` between attempts; any HTTP
/// response, successful or not, ends the loop.
pub struct WebhookCrm {
    url: String,
    api_key: String,
    max_attempts: u32,
    backoff: Duration,
    client: reqwest::Client,
}

impl WebhookCrm {
    pub fn new(config: &CrmConfig) -> Result<Self, IntegrationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| IntegrationError::Internal(e.to_string()))?;

        Ok(Self {
            url: config.webhook_url.trim().to_string(),
            api_key: config.api_key.trim().to_string(),
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.backoff_ms),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    async fn post_once(
        &self,
        envelope: &WebhookEnvelope<'_>,
    ) -> Result<reqwest::Response, IntegrationError> {
        let mut request = self.client.post(&self.url).json(envelope);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        Ok(request.send().await?)
    }

    async fn classify(response: reqwest::Response) -> DeliveryReport {
        let status = response.status();
        if status.is_success() {
            return DeliveryReport::sent(status.as_u16().to_string());
        }

        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        DeliveryReport::error(format!("status={} body={}", status.as_u16(), excerpt))
    }
}

#[async_trait]
impl CrmIntegration for WebhookCrm {
    async fn deliver(&self, lead: &ScoredLead) -> DeliveryReport {
        if !self.is_configured() {
            return DeliveryReport::skipped("No CRM_WEBHOOK_URL set");
        }

        let envelope = WebhookEnvelope::new(lead);
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match self.post_once(&envelope).await {
                Ok(response) => {
                    let report = Self::classify(response).await;
                    tracing::info!(
                        attempt,
                        status = report.status.as_str(),
                        note = %report.note,
                        "CRM webhook responded"
                    );
                    return report;
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "CRM webhook attempt failed"
                    );
                    last_error = Some(e);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt made".to_string());
        DeliveryReport::error(format!("exception: {}", reason))
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

/// Stub CRM implementation for development/testing
///
/// Answers every delivery with a fixed report and counts the calls.
pub struct StubCrmIntegration {
    report: DeliveryReport,
    calls: AtomicUsize,
}

impl StubCrmIntegration {
    pub fn new(report: DeliveryReport) -> Self {
        Self {
            report,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of deliveries seen so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StubCrmIntegration {
    fn default() -> Self {
        Self::new(DeliveryReport::sent("200"))
    }
}

#[async_trait]
impl CrmIntegration for StubCrmIntegration {
    async fn deliver(&self, lead: &ScoredLead) -> DeliveryReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::info!(score = lead.score, "Stub CRM: Delivered lead");
        self.report.clone()
    }

    fn name(&self) -> &str {
        "stub"
    }
}
