//! LLM Backend implementations
//!
//! One OpenAI-compatible chat completions backend. Anything that speaks the
//! `/chat/completions` wire format (OpenAI, Azure through a gateway, vLLM)
//! can be pointed at with `endpoint`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use lead_qualifier_config::constants::{endpoints, llm};

use crate::prompt::{Message, Role};
use crate::LlmError;

/// LLM generation result
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Generated text
    pub text: String,
    /// Completion tokens reported by the API, 0 when not reported
    pub tokens: usize,
    /// Total generation time (ms)
    pub total_time_ms: u64,
    pub finish_reason: FinishReason,
}

/// Finish reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    Error,
}

/// LLM Backend trait
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a response
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Configuration for OpenAI-compatible backends
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API endpoint, e.g. https://api.openai.com/v1
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Temperature (0-2)
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::OPENAI_DEFAULT.to_string(),
            api_key: String::new(),
            model: llm::DEFAULT_MODEL.to_string(),
            max_tokens: llm::MAX_TOKENS,
            temperature: llm::TEMPERATURE,
            timeout: Duration::from_secs(llm::TIMEOUT_SECS),
        }
    }
}

impl OpenAIConfig {
    /// Create config for OpenAI
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            ..Default::default()
        }
    }
}

impl From<&lead_qualifier_config::LlmConfig> for OpenAIConfig {
    fn from(config: &lead_qualifier_config::LlmConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// OpenAI-compatible backend
pub struct OpenAIBackend {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIBackend {
    /// Create new OpenAI backend
    pub fn new(config: OpenAIConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Configuration("API key required".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the full API URL for chat completions
    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    /// Build request headers
    fn build_headers(&self) -> reqwest::header::HeaderMap {
        use reqwest::header::HeaderValue;

        let mut headers = reqwest::header::HeaderMap::new();

        let auth_value = format!("Bearer {}", self.config.api_key);
        if let Ok(val) = HeaderValue::from_str(&auth_value) {
            headers.insert(reqwest::header::AUTHORIZATION, val);
        }

        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        headers
    }

    fn build_request(&self, messages: &[Message]) -> OpenAIChatRequest {
        OpenAIChatRequest {
            model: self.config.model.clone(),
            messages: messages.iter().map(OpenAIMessage::from).collect(),
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAIBackend {
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
        let start = std::time::Instant::now();
        let request = self.build_request(messages);

        let response = self
            .client
            .post(self.chat_url())
            .headers(self.build_headers())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let response: OpenAIChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        let total_time_ms = start.elapsed().as_millis() as u64;
        let tokens = response.usage.map(|u| u.completion_tokens).unwrap_or(0);

        tracing::debug!(
            model = %self.config.model,
            tokens,
            total_time_ms,
            "LLM generation complete"
        );

        Ok(GenerationResult {
            text: choice.message.content.unwrap_or_default(),
            tokens,
            total_time_ms,
            finish_reason: match choice.finish_reason.as_deref() {
                Some("length") => FinishReason::Length,
                Some("content_filter") => FinishReason::Error,
                _ => FinishReason::Stop,
            },
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: &'static str,
    content: String,
}

impl From<&Message> for OpenAIMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: match msg.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    /// Null when the model refused or only called tools
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    completion_tokens: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_config_default() {
        let config = OpenAIConfig::default();
        assert_eq!(config.endpoint, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_backend_requires_api_key() {
        let backend = OpenAIBackend::new(OpenAIConfig::default());
        assert!(matches!(backend, Err(LlmError::Configuration(_))));

        let backend = OpenAIBackend::new(OpenAIConfig::openai("   ", "gpt-4o-mini"));
        assert!(matches!(backend, Err(LlmError::Configuration(_))));

        let backend = OpenAIBackend::new(OpenAIConfig::openai("sk-xxx", "gpt-4o"));
        assert!(backend.is_ok());
    }

    #[test]
    fn test_chat_url_and_headers() {
        let mut config = OpenAIConfig::openai("sk-xxx", "gpt-4o-mini");
        config.endpoint = "http://llm.internal/v1/".to_string();
        let backend = OpenAIBackend::new(config).unwrap();

        assert_eq!(backend.chat_url(), "http://llm.internal/v1/chat/completions");
        let headers = backend.build_headers();
        assert_eq!(
            headers.get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer sk-xxx"
        );
        assert_eq!(backend.model_name(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_serialization() {
        let backend = OpenAIBackend::new(OpenAIConfig::openai("sk-xxx", "gpt-4o-mini")).unwrap();
        let request = backend.build_request(&[
            Message::system("be brief"),
            Message::user("I need auto insurance"),
        ]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "I need auto insurance");
        assert_eq!(json["max_tokens"], 256);
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello there!"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;
        let parsed: OpenAIChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Hello there!"));
        assert_eq!(parsed.usage.unwrap().completion_tokens, 3);

        let empty: OpenAIChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(empty.choices.is_empty());
    }

    #[test]
    fn test_from_settings() {
        let mut settings = lead_qualifier_config::LlmConfig::default();
        settings.api_key = " sk-abc ".to_string();
        settings.model = "gpt-4o".to_string();
        settings.timeout_seconds = 5;

        let config = OpenAIConfig::from(&settings);
        assert_eq!(config.api_key, "sk-abc");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_error() {
        let mut config = OpenAIConfig::openai("sk-xxx", "gpt-4o-mini");
        config.endpoint = "http://127.0.0.1:1/v1".to_string();
        config.timeout = Duration::from_secs(2);
        let backend = OpenAIBackend::new(config).unwrap();

        let result = backend.generate(&[Message::user("hi")]).await;
        assert!(matches!(
            result,
            Err(LlmError::Network(_)) | Err(LlmError::Timeout)
        ));
    }
}
