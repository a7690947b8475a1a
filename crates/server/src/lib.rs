//! Lead Qualifier Server
//!
//! HTTP endpoints for chat-driven lead intake and structured extraction.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::{create_router, ChatRequest, ChatResponse, ExtractRequest, ExtractResponse};
pub use metrics::{
    init_metrics, metrics_handler, record_chat_reply, record_crm_delivery, record_llm_fallback,
    record_llm_latency, record_request,
};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Config(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<lead_qualifier_tools::IntegrationError> for ServerError {
    fn from(err: lead_qualifier_tools::IntegrationError) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl From<lead_qualifier_config::ConfigError> for ServerError {
    fn from(err: lead_qualifier_config::ConfigError) -> Self {
        ServerError::Config(err.to_string())
    }
}
