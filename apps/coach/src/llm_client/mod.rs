//! LLM Client — the single point of entry for all chat-completion calls.
//!
//! No other module may talk to a model provider directly. Callers depend on the
//! `ChatClient` trait; `ModelGateway` is the HTTP implementation that walks a
//! provider's model fallback chain until one model answers.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod providers;

pub use providers::{detect_provider_from_key, Provider};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Could not detect provider from API key. Please specify provider explicitly.")]
    UnknownProvider,

    #[error("All models failed for {provider}. Attempted: {}. Last error: {last_error}", .attempted.join(" -> "))]
    AllModelsFailed {
        provider: Provider,
        attempted: Vec<String>,
        last_error: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input: u32,
    pub output: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    pub content: String,
    pub model: String,
    pub provider: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<TokenUsage>,
    /// Models that failed before `model` answered, in attempt order.
    pub fallbacks_attempted: Vec<String>,
}

/// Anything that can answer a chat conversation.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ModelResponse, LlmError>;
}

#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub preferred_model: Option<String>,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            preferred_model: None,
            max_retries: 3,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Multi-provider chat client with per-provider model fallback.
#[derive(Clone)]
pub struct ModelGateway {
    client: Client,
    api_key: String,
    provider: Provider,
    preferred_model: String,
    max_retries: u32,
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelGateway")
            .field("provider", &self.provider)
            .field("preferred_model", &self.preferred_model)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl ModelGateway {
    /// Builds a gateway for `provider`, or for the provider detected from the key
    /// prefix when `provider` is `None`.
    pub fn new(
        api_key: String,
        provider: Option<Provider>,
        options: GatewayOptions,
    ) -> Result<Self, LlmError> {
        let provider = provider
            .or_else(|| detect_provider_from_key(&api_key))
            .ok_or(LlmError::UnknownProvider)?;

        let client = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            provider,
            preferred_model: options
                .preferred_model
                .unwrap_or_else(|| provider.latest_model().to_string()),
            max_retries: options.max_retries,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn current_model(&self) -> &str {
        &self.preferred_model
    }

    /// Preferred model, then the rest of the provider's chain, capped at
    /// `max_retries + 1` attempts.
    pub fn model_chain(&self) -> Vec<String> {
        model_chain(self.provider, &self.preferred_model, self.max_retries)
    }

    async fn request(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<providers::Completion, LlmError> {
        let wire = providers::build_request(self.provider, &self.api_key, model, messages)?;

        let mut builder = self.client.post(&wire.url).json(&wire.body);
        for (name, value) in &wire.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: providers::error_message(&body),
            });
        }

        providers::parse_response(self.provider, &body)
    }
}

#[async_trait]
impl ChatClient for ModelGateway {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ModelResponse, LlmError> {
        let mut fallbacks_attempted = Vec::new();
        let mut last_error = String::from("no models attempted");

        for model in self.model_chain() {
            info!(provider = %self.provider, model = %model, "Attempting chat completion");

            match self.request(&model, messages).await {
                Ok(completion) => {
                    if let Some(usage) = completion.tokens_used {
                        debug!(
                            "LLM call succeeded: input_tokens={}, output_tokens={}",
                            usage.input, usage.output
                        );
                    }
                    return Ok(ModelResponse {
                        content: completion.content,
                        model,
                        provider: self.provider,
                        tokens_used: completion.tokens_used,
                        fallbacks_attempted,
                    });
                }
                Err(e) => {
                    warn!("{}/{} failed: {}. Trying next...", self.provider, model, e);
                    last_error = e.to_string();
                    fallbacks_attempted.push(model);
                }
            }
        }

        Err(LlmError::AllModelsFailed {
            provider: self.provider,
            attempted: fallbacks_attempted,
            last_error,
        })
    }
}

fn model_chain(provider: Provider, preferred: &str, max_retries: u32) -> Vec<String> {
    std::iter::once(preferred)
        .chain(
            provider
                .fallback_chain()
                .iter()
                .copied()
                .filter(|m| *m != preferred),
        )
        .take(max_retries as usize + 1)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain_starts_at_latest() {
        assert_eq!(
            model_chain(Provider::OpenAi, "gpt-4o", 3),
            vec!["gpt-4o", "gpt-4o-mini", "gpt-4-turbo"]
        );
    }

    #[test]
    fn test_preferred_model_moves_to_front() {
        assert_eq!(
            model_chain(Provider::Anthropic, "claude-3-haiku-20240307", 3),
            vec![
                "claude-3-haiku-20240307",
                "claude-sonnet-4-20250514",
                "claude-3-5-sonnet-20241022",
            ]
        );
    }

    #[test]
    fn test_unknown_preferred_model_is_tried_first() {
        assert_eq!(
            model_chain(Provider::XAi, "grok-beta", 3),
            vec!["grok-beta", "grok-3", "grok-3-mini"]
        );
    }

    #[test]
    fn test_chain_truncated_to_max_retries_plus_one() {
        assert_eq!(model_chain(Provider::OpenAi, "gpt-4o", 0), vec!["gpt-4o"]);
        assert_eq!(model_chain(Provider::OpenAi, "gpt-4o", 1).len(), 2);
    }

    #[test]
    fn test_gateway_detects_provider() {
        let gw = ModelGateway::new("xai-abc".into(), None, GatewayOptions::default()).unwrap();
        assert_eq!(gw.provider(), Provider::XAi);
        assert_eq!(gw.current_model(), "grok-3");
    }

    #[test]
    fn test_gateway_rejects_unknown_key_without_provider() {
        let err = ModelGateway::new("nope".into(), None, GatewayOptions::default()).unwrap_err();
        assert!(matches!(err, LlmError::UnknownProvider));
    }

    #[test]
    fn test_gateway_debug_hides_api_key() {
        let gw = ModelGateway::new("sk-ant-secret".into(), None, GatewayOptions::default()).unwrap();
        let shown = format!("{gw:?}");
        assert!(shown.contains("Anthropic"));
        assert!(!shown.contains("sk-ant-secret"));
    }

    #[test]
    fn test_explicit_provider_overrides_detection() {
        let gw = ModelGateway::new(
            "nope".into(),
            Some(Provider::Google),
            GatewayOptions {
                preferred_model: Some("gemini-1.5-flash".into()),
                ..GatewayOptions::default()
            },
        )
        .unwrap();
        assert_eq!(
            gw.model_chain(),
            vec!["gemini-1.5-flash", "gemini-2.0-flash"]
        );
    }

    #[test]
    fn test_all_models_failed_message() {
        let err = LlmError::AllModelsFailed {
            provider: Provider::Anthropic,
            attempted: vec!["a".into(), "b".into()],
            last_error: "boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "All models failed for anthropic. Attempted: a -> b. Last error: boom"
        );
    }

    #[test]
    fn test_model_response_camel_case() {
        let r = ModelResponse {
            content: "x".into(),
            model: "grok-3".into(),
            provider: Provider::XAi,
            tokens_used: None,
            fallbacks_attempted: vec![],
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["provider"], "xai");
        assert!(json.get("fallbacksAttempted").is_some());
        assert!(json.get("tokensUsed").is_none());
    }
}
