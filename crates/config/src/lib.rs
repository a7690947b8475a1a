//! Configuration management for the lead qualifier
//!
//! Supports loading configuration from:
//! - YAML/TOML/JSON files under `config/`
//! - Environment variables (LEAD_QUALIFIER_ prefix, `__` separator)
//! - The bare variable names of the legacy deployment
//!   (`OPENAI_API_KEY`, `MODEL`, `CRM_WEBHOOK_URL`, `CRM_API_KEY`)

pub mod agent;
pub mod constants;
pub mod settings;

pub use agent::{AgentConfig, FieldMemory};
pub use settings::{
    load_settings, load_settings_from, CrmConfig, LlmConfig, ObservabilityConfig,
    RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
