//! LLM Integration
//!
//! Features:
//! - `LlmBackend` trait so the transport layer can swap or stub the model
//! - OpenAI-compatible chat completions backend
//! - Intake system prompt and the acceptance rule for model replies
//!
//! The model is an optional enhancement: every error here is recoverable by
//! falling back to the deterministic qualifier.

pub mod backend;
pub mod factory;
pub mod prompt;

pub use backend::{FinishReason, GenerationResult, LlmBackend, OpenAIBackend, OpenAIConfig};
pub use factory::create_llm_backend;
pub use prompt::{accept_reply, build_messages, Message, Role, MIN_REPLY_CHARS, SYSTEM_PROMPT};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}
