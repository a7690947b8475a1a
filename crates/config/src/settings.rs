//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{crm, endpoints, env_vars, llm};
use crate::{AgentConfig, ConfigError};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM enhancement for chat replies
    #[serde(default)]
    pub llm: LlmConfig,

    /// CRM webhook delivery
    #[serde(default)]
    pub crm: CrmConfig,

    /// Qualifier behavior
    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_llm()?;
        self.validate_crm()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block legitimate requests."
            );
        }

        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        if self.llm.is_enabled() && self.llm.timeout_seconds >= self.server.timeout_seconds {
            tracing::warn!(
                llm_timeout = self.llm.timeout_seconds,
                request_timeout = self.server.timeout_seconds,
                "LLM timeout is not below the request timeout; slow LLM calls will time out \
                 the request instead of falling back"
            );
        }

        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }

        Ok(())
    }

    fn validate_crm(&self) -> Result<(), ConfigError> {
        let crm = &self.crm;

        if crm.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "crm.max_attempts".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if crm.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "crm.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        let url = crm.webhook_url.trim();
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "crm.webhook_url".to_string(),
                message: format!("Must be an http(s) URL, got '{}'", url),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds. Kept above `llm.timeout_seconds` so a slow
    /// model still leaves time for the deterministic fallback.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    45
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
        }
    }
}

/// LLM configuration
///
/// An empty `api_key` disables the LLM entirely and every chat reply comes
/// from the rule-based qualifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_api_key")]
    pub api_key: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_llm_api_key() -> String {
    std::env::var(env_vars::LLM_API_KEY).unwrap_or_default()
}
fn default_llm_model() -> String {
    std::env::var(env_vars::LLM_MODEL)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| llm::DEFAULT_MODEL.to_string())
}
fn default_llm_endpoint() -> String {
    endpoints::OPENAI_DEFAULT.to_string()
}
fn default_llm_timeout() -> u64 {
    llm::TIMEOUT_SECS
}
fn default_max_tokens() -> usize {
    llm::MAX_TOKENS
}
fn default_temperature() -> f32 {
    llm::TEMPERATURE
}

impl LlmConfig {
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: default_llm_api_key(),
            model: default_llm_model(),
            endpoint: default_llm_endpoint(),
            timeout_seconds: default_llm_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// CRM webhook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmConfig {
    /// Webhook receiving finished leads. Empty means delivery is skipped.
    #[serde(default = "default_crm_webhook_url")]
    pub webhook_url: String,

    /// Sent as a bearer token when non-empty
    #[serde(default = "default_crm_api_key")]
    pub api_key: String,

    /// Per-attempt timeout
    #[serde(default = "default_crm_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_crm_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts
    #[serde(default = "default_crm_backoff")]
    pub backoff_ms: u64,
}

fn default_crm_webhook_url() -> String {
    std::env::var(env_vars::CRM_WEBHOOK_URL)
        .map(|u| u.trim().to_string())
        .unwrap_or_default()
}
fn default_crm_api_key() -> String {
    std::env::var(env_vars::CRM_API_KEY)
        .map(|k| k.trim().to_string())
        .unwrap_or_default()
}
fn default_crm_timeout() -> u64 {
    crm::TIMEOUT_SECS
}
fn default_crm_attempts() -> u32 {
    crm::MAX_ATTEMPTS
}
fn default_crm_backoff() -> u64 {
    crm::BACKOFF_MS
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            webhook_url: default_crm_webhook_url(),
            api_key: default_crm_api_key(),
            timeout_seconds: default_crm_timeout(),
            max_attempts: default_crm_attempts(),
            backoff_ms: default_crm_backoff(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,

    /// Serve Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from `config/` and the environment
///
/// Priority: env vars > config/{env}.* > config/default.* > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from an explicit config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(
        File::with_name(&dir.join("default").to_string_lossy()).required(false),
    );

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&dir.join(env_name).to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(env_vars::PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
