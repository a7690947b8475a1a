//! LLM Factory
//!
//! Builds the optional chat backend from settings. A missing API key is not
//! an error for the service as a whole: the server simply runs in
//! deterministic mode.

use std::sync::Arc;

use lead_qualifier_config::LlmConfig;

use crate::backend::{LlmBackend, OpenAIBackend, OpenAIConfig};

/// Create the configured backend, or `None` when the LLM is disabled or
/// cannot be constructed
pub fn create_llm_backend(config: &LlmConfig) -> Option<Arc<dyn LlmBackend>> {
    if !config.is_enabled() {
        tracing::info!("No LLM API key configured, replies are fully deterministic");
        return None;
    }

    match OpenAIBackend::new(OpenAIConfig::from(config)) {
        Ok(backend) => {
            tracing::info!(model = %config.model, endpoint = %config.endpoint, "LLM backend ready");
            Some(Arc::new(backend))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM backend unavailable, falling back to deterministic replies");
            None
        }
    }
}
