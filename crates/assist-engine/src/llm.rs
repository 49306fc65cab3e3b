//! LLM chat completion client
//!
//! Groq serves the OpenAI-compatible chat completions API. Requests are
//! built from a typed system/user prompt pair validated at construction, so
//! call sites cannot send malformed message payloads. Transient provider
//! errors (429, 5xx, timeouts) are retried a bounded number of times.

use std::time::Duration;

use assist_core::{AssistError, LlmConfig, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

// ============================================================================
// Typed Prompt
// ============================================================================

/// A validated chat completion request: one system turn, one user turn, and
/// an optional fixed temperature (providers pick their default when unset).
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    system: String,
    user: String,
    temperature: Option<f32>,
}

impl ChatPrompt {
    /// Create a prompt. Empty turns are rejected at the boundary.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Result<Self> {
        let system = system.into();
        let user = user.into();

        if system.trim().is_empty() {
            return Err(AssistError::ValidationError(
                "System prompt must not be empty".to_string(),
            ));
        }
        if user.trim().is_empty() {
            return Err(AssistError::ValidationError(
                "User turn must not be empty".to_string(),
            ));
        }

        Ok(Self {
            system,
            user,
            temperature: None,
        })
    }

    /// Pin the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Result<Self> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AssistError::ValidationError(format!(
                "Temperature {temperature} outside [0, 2]"
            )));
        }
        self.temperature = Some(temperature);
        Ok(self)
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}

// ============================================================================
// Completion Trait
// ============================================================================

/// Trait for chat completion providers
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// Execute one completion and return the assistant text verbatim
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String>;
}

// ============================================================================
// Groq Client
// ============================================================================

/// Groq API client (OpenAI-compatible chat completions)
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_retries: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Choice {
    message: Message,
    finish_reason: Option<String>,
}

impl GroqClient {
    /// Create a new client with default endpoint and retry settings
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let defaults = LlmConfig::default();
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: defaults.base_url,
            model: model.into(),
            max_retries: defaults.max_retries,
        }
    }

    /// Create from config, with per-request and connect timeouts applied.
    ///
    /// A missing API key is a hard error so a misconfigured service fails at
    /// construction time, before it serves traffic.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .ok_or_else(|| AssistError::ConfigError("GROQ_API_KEY is required".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AssistError::LlmError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }

    /// Set custom base URL (for other OpenAI-compatible APIs)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatCompletionClient for GroqClient {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: prompt.system().to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.user().to_string(),
                },
            ],
            temperature: prompt.temperature(),
        };

        let mut attempt: u32 = 0;
        loop {
            let outcome = self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await;

            // Transient failures fall through to the retry check; everything
            // else returns immediately.
            let failure = match outcome {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let result: ChatCompletionResponse =
                            response.json().await.map_err(|e| {
                                AssistError::LlmError(format!("Failed to parse response: {e}"))
                            })?;

                        return result
                            .choices
                            .first()
                            .map(|c| c.message.content.clone())
                            .ok_or_else(|| {
                                AssistError::LlmError("No completion returned".to_string())
                            });
                    }

                    let error_text = response.text().await.unwrap_or_default();
                    let error =
                        AssistError::LlmError(format!("Provider error ({status}): {error_text}"));
                    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        error
                    } else {
                        return Err(error);
                    }
                }
                Err(e) => {
                    let error = AssistError::LlmError(format!("Request failed: {e}"));
                    if e.is_timeout() || e.is_connect() {
                        error
                    } else {
                        return Err(error);
                    }
                }
            };

            if attempt >= self.max_retries {
                return Err(failure);
            }
            attempt += 1;
            tracing::warn!(attempt, error = %failure, "Transient LLM failure, retrying");
            tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_rejects_empty_user_turn() {
        assert!(ChatPrompt::new("system", "").is_err());
        assert!(ChatPrompt::new("system", "   ").is_err());
        assert!(ChatPrompt::new("", "user").is_err());
    }

    #[test]
    fn test_prompt_temperature_range() {
        let prompt = ChatPrompt::new("system", "user").unwrap();
        assert!(prompt.clone().with_temperature(0.0).is_ok());
        assert!(prompt.clone().with_temperature(2.0).is_ok());
        assert!(prompt.clone().with_temperature(-0.1).is_err());
        assert!(prompt.with_temperature(3.0).is_err());
    }

    #[test]
    fn test_prompt_defaults_to_provider_temperature() {
        let prompt = ChatPrompt::new("system", "user").unwrap();
        assert_eq!(prompt.temperature(), None);

        let pinned = prompt.with_temperature(0.0).unwrap();
        assert_eq!(pinned.temperature(), Some(0.0));
    }

    #[test]
    fn test_client_creation() {
        let client = GroqClient::new("gsk_test", "llama3-8b-8192");
        assert_eq!(client.model(), "llama3-8b-8192");
        assert_eq!(client.base_url, "https://api.groq.com/openai/v1");
    }

    #[test]
    fn test_client_custom_base_url() {
        let client = GroqClient::new("gsk_test", "llama3-8b-8192")
            .with_base_url("http://localhost:9999/v1");
        assert_eq!(client.base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = LlmConfig::default();
        assert!(matches!(
            GroqClient::from_config(&config),
            Err(AssistError::ConfigError(_))
        ));

        let config = LlmConfig {
            api_key: Some("gsk_test".to_string()),
            ..Default::default()
        };
        assert!(GroqClient::from_config(&config).is_ok());
    }
}
