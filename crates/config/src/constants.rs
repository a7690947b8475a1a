//! Centralized constants for the lead qualifier
//!
//! Default endpoints and the environment variable names inherited from the
//! legacy single-process deployment.

/// External service endpoints
pub mod endpoints {
    /// OpenAI-compatible chat completions base URL
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";
}

/// Environment variable names read as configuration defaults
pub mod env_vars {
    /// Selects `config/{env}.yaml`
    pub const ENVIRONMENT: &str = "LEAD_QUALIFIER_ENV";
    /// Prefix for structured overrides, e.g. `LEAD_QUALIFIER__SERVER__PORT`
    pub const PREFIX: &str = "LEAD_QUALIFIER";

    pub const LLM_API_KEY: &str = "OPENAI_API_KEY";
    pub const LLM_MODEL: &str = "MODEL";
    pub const CRM_WEBHOOK_URL: &str = "CRM_WEBHOOK_URL";
    pub const CRM_API_KEY: &str = "CRM_API_KEY";
}

/// LLM call defaults
pub mod llm {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const TIMEOUT_SECS: u64 = 30;
    pub const MAX_TOKENS: usize = 256;
    pub const TEMPERATURE: f32 = 0.7;
}

/// CRM webhook delivery defaults
pub mod crm {
    pub const TIMEOUT_SECS: u64 = 10;
    pub const MAX_ATTEMPTS: u32 = 3;
    pub const BACKOFF_MS: u64 = 500;
}
