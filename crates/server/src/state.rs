//! Application State
//!
//! Shared state across all handlers. Everything is immutable after startup;
//! the qualifier is pure, so no locking is needed.

use std::sync::Arc;

use lead_qualifier_agent::LeadQualifier;
use lead_qualifier_config::Settings;
use lead_qualifier_llm::{create_llm_backend, LlmBackend};
use lead_qualifier_tools::{CrmIntegration, WebhookCrm};

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    /// Deterministic qualifier, the fallback of record for every reply
    pub qualifier: Arc<LeadQualifier>,
    /// Optional LLM enhancement for chat replies
    pub llm: Option<Arc<dyn LlmBackend>>,
    /// CRM sink for structured leads
    pub crm: Arc<dyn CrmIntegration>,
}

impl AppState {
    /// Build state from settings: LLM when a key is configured, webhook CRM
    ///
    /// Settings are validated again here since they may not come from
    /// `load_settings`.
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        config.validate()?;

        let qualifier = LeadQualifier::new(&config.agent);
        let llm = create_llm_backend(&config.llm);
        let crm = WebhookCrm::new(&config.crm)?;

        if !crm.is_configured() {
            tracing::info!("No CRM webhook configured, leads will be reported as skipped");
        }

        Ok(Self {
            config: Arc::new(config),
            qualifier: Arc::new(qualifier),
            llm,
            crm: Arc::new(crm),
        })
    }

    /// Replace the LLM backend
    pub fn with_llm(mut self, llm: Option<Arc<dyn LlmBackend>>) -> Self {
        self.llm = llm;
        self
    }

    /// Replace the CRM integration
    pub fn with_crm(mut self, crm: Arc<dyn CrmIntegration>) -> Self {
        self.crm = crm;
        self
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.is_some()
    }
}
