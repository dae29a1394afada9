//! Provider registry and per-provider wire formats.
//!
//! Request bodies are built from borrowed `ChatMessage`s; responses are decoded
//! into a provider-neutral `Completion`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::llm_client::{ChatMessage, LlmError, Role, TokenUsage};

pub const MAX_TOKENS: u32 = 4096;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const XAI_API_URL: &str = "https://api.x.ai/v1/chat/completions";
const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
    Google,
    #[serde(rename = "xai")]
    XAi,
}

impl Provider {
    pub fn latest_model(self) -> &'static str {
        self.fallback_chain()[0]
    }

    /// Models to try, most capable first.
    pub fn fallback_chain(self) -> &'static [&'static str] {
        match self {
            Provider::Anthropic => &[
                "claude-sonnet-4-20250514",
                "claude-3-5-sonnet-20241022",
                "claude-3-haiku-20240307",
            ],
            Provider::OpenAi => &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo"],
            Provider::Google => &["gemini-2.0-flash", "gemini-1.5-flash"],
            Provider::XAi => &["grok-3", "grok-3-mini"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::OpenAi => "openai",
            Provider::Google => "google",
            Provider::XAi => "xai",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guesses the provider from an API key prefix.
///
/// `sk-ant-` must be checked before the broader `sk-`.
pub fn detect_provider_from_key(api_key: &str) -> Option<Provider> {
    if api_key.starts_with("sk-ant-") {
        Some(Provider::Anthropic)
    } else if api_key.starts_with("sk-") {
        Some(Provider::OpenAi)
    } else if api_key.starts_with("AIza") {
        Some(Provider::Google)
    } else if api_key.starts_with("xai-") {
        Some(Provider::XAi)
    } else {
        None
    }
}

/// Provider-neutral result of one successful request.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub tokens_used: Option<TokenUsage>,
}

/// A fully-specified HTTP request, ready for reqwest.
#[derive(Debug)]
pub struct WireRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: serde_json::Value,
}

pub fn build_request(
    provider: Provider,
    api_key: &str,
    model: &str,
    messages: &[ChatMessage],
) -> Result<WireRequest, LlmError> {
    match provider {
        Provider::Anthropic => {
            let system = messages
                .iter()
                .find(|m| m.role == Role::System)
                .map(|m| m.content.as_str())
                .unwrap_or("");
            let body = AnthropicRequest {
                model,
                max_tokens: MAX_TOKENS,
                system,
                messages: messages
                    .iter()
                    .filter(|m| m.role != Role::System)
                    .map(|m| WireMessage {
                        role: m.role.as_str(),
                        content: &m.content,
                    })
                    .collect(),
            };
            Ok(WireRequest {
                url: ANTHROPIC_API_URL.to_string(),
                headers: vec![
                    ("x-api-key", api_key.to_string()),
                    ("anthropic-version", ANTHROPIC_VERSION.to_string()),
                ],
                body: serde_json::to_value(body)?,
            })
        }
        Provider::OpenAi | Provider::XAi => {
            let url = if provider == Provider::OpenAi {
                OPENAI_API_URL
            } else {
                XAI_API_URL
            };
            let body = ChatCompletionsRequest {
                model,
                max_tokens: MAX_TOKENS,
                messages: messages
                    .iter()
                    .map(|m| WireMessage {
                        role: m.role.as_str(),
                        content: &m.content,
                    })
                    .collect(),
            };
            Ok(WireRequest {
                url: url.to_string(),
                headers: vec![("authorization", format!("Bearer {api_key}"))],
                body: serde_json::to_value(body)?,
            })
        }
        Provider::Google => {
            let system_instruction = messages
                .iter()
                .find(|m| m.role == Role::System)
                .map(|m| GoogleContent {
                    role: None,
                    parts: vec![GooglePart { text: &m.content }],
                });
            let body = GoogleRequest {
                system_instruction,
                contents: messages
                    .iter()
                    .filter(|m| m.role != Role::System)
                    .map(|m| GoogleContent {
                        role: Some(if m.role == Role::Assistant { "model" } else { "user" }),
                        parts: vec![GooglePart { text: &m.content }],
                    })
                    .collect(),
                generation_config: GoogleGenerationConfig {
                    max_output_tokens: MAX_TOKENS,
                },
            };
            Ok(WireRequest {
                url: format!("{GOOGLE_API_BASE}/{model}:generateContent?key={api_key}"),
                headers: Vec::new(),
                body: serde_json::to_value(body)?,
            })
        }
    }
}

pub fn parse_response(provider: Provider, body: &str) -> Result<Completion, LlmError> {
    match provider {
        Provider::Anthropic => {
            let resp: AnthropicResponse = serde_json::from_str(body)?;
            let content = resp
                .content
                .into_iter()
                .find(|b| b.block_type == "text")
                .and_then(|b| b.text)
                .ok_or(LlmError::EmptyContent)?;
            Ok(Completion {
                content,
                tokens_used: resp.usage.map(|u| TokenUsage {
                    input: u.input_tokens,
                    output: u.output_tokens,
                }),
            })
        }
        Provider::OpenAi | Provider::XAi => {
            let resp: ChatCompletionsResponse = serde_json::from_str(body)?;
            let content = resp
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .ok_or(LlmError::EmptyContent)?;
            Ok(Completion {
                content,
                tokens_used: resp.usage.map(|u| TokenUsage {
                    input: u.prompt_tokens,
                    output: u.completion_tokens,
                }),
            })
        }
        Provider::Google => {
            let resp: GoogleResponse = serde_json::from_str(body)?;
            let content = resp
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content.parts.into_iter().next())
                .map(|p| p.text)
                .ok_or(LlmError::EmptyContent)?;
            Ok(Completion {
                content,
                tokens_used: resp.usage_metadata.map(|u| TokenUsage {
                    input: u.prompt_token_count,
                    output: u.candidates_token_count,
                }),
            })
        }
    }
}

/// Pulls a human-readable message out of a provider error body, if it has one.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Wire structs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GoogleContent<'a>>,
    contents: Vec<GoogleContent<'a>>,
    generation_config: GoogleGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GoogleContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GooglePart<'a>>,
}

#[derive(Debug, Serialize)]
struct GooglePart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleResponse {
    candidates: Vec<GoogleCandidate>,
    usage_metadata: Option<GoogleUsage>,
}

#[derive(Debug, Deserialize)]
struct GoogleCandidate {
    content: GoogleCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GoogleCandidateContent {
    parts: Vec<GoogleResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GoogleResponsePart {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleUsage {
    prompt_token_count: u32,
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Vec<ChatMessage> {
        let msg = |role, content: &str| ChatMessage {
            role,
            content: content.to_string(),
        };
        vec![
            msg(Role::System, "be brief"),
            msg(Role::User, "hi"),
            msg(Role::Assistant, "hello"),
            msg(Role::User, "score this"),
        ]
    }

    #[test]
    fn test_detect_provider_from_key() {
        assert_eq!(detect_provider_from_key("sk-ant-api03-abc"), Some(Provider::Anthropic));
        assert_eq!(detect_provider_from_key("sk-proj-abc"), Some(Provider::OpenAi));
        assert_eq!(detect_provider_from_key("AIzaSyD-abc"), Some(Provider::Google));
        assert_eq!(detect_provider_from_key("xai-abc"), Some(Provider::XAi));
        assert_eq!(detect_provider_from_key("pk_live_abc"), None);
    }

    #[test]
    fn test_latest_model_heads_the_chain() {
        assert_eq!(Provider::Anthropic.latest_model(), "claude-sonnet-4-20250514");
        assert_eq!(Provider::OpenAi.latest_model(), "gpt-4o");
        assert_eq!(Provider::Google.latest_model(), "gemini-2.0-flash");
        assert_eq!(Provider::XAi.latest_model(), "grok-3");
    }

    #[test]
    fn test_anthropic_request_hoists_system() {
        let req = build_request(Provider::Anthropic, "sk-ant-x", "m", &conversation()).unwrap();
        assert_eq!(req.url, ANTHROPIC_API_URL);
        assert_eq!(req.body["system"], "be brief");
        assert_eq!(req.body["max_tokens"], 4096);
        let msgs = req.body["messages"].as_array().unwrap();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0]["role"], "user");
        assert!(req.headers.iter().any(|(k, v)| *k == "x-api-key" && v == "sk-ant-x"));
    }

    #[test]
    fn test_chat_completions_request_keeps_system_inline() {
        let req = build_request(Provider::XAi, "xai-k", "grok-3", &conversation()).unwrap();
        assert_eq!(req.url, XAI_API_URL);
        assert_eq!(req.body["messages"][0]["role"], "system");
        assert_eq!(req.body["messages"].as_array().unwrap().len(), 4);
        assert_eq!(req.headers, vec![("authorization", "Bearer xai-k".to_string())]);
    }

    #[test]
    fn test_google_request_maps_roles() {
        let req =
            build_request(Provider::Google, "AIzaK", "gemini-2.0-flash", &conversation()).unwrap();
        assert!(req.url.ends_with("/gemini-2.0-flash:generateContent?key=AIzaK"));
        assert_eq!(req.body["systemInstruction"]["parts"][0]["text"], "be brief");
        let contents = req.body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(req.body["generationConfig"]["maxOutputTokens"], 4096);
    }

    #[test]
    fn test_google_request_without_system_omits_instruction() {
        let req = build_request(Provider::Google, "k", "m", &[ChatMessage::user("x")]).unwrap();
        assert!(req.body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_anthropic_response() {
        let body = r#"{"content":[{"type":"text","text":"{\"ok\":1}"}],"usage":{"input_tokens":10,"output_tokens":3}}"#;
        let c = parse_response(Provider::Anthropic, body).unwrap();
        assert_eq!(c.content, "{\"ok\":1}");
        assert_eq!(c.tokens_used, Some(TokenUsage { input: 10, output: 3 }));
    }

    #[test]
    fn test_parse_openai_response() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}],"usage":{"prompt_tokens":5,"completion_tokens":1}}"#;
        let c = parse_response(Provider::OpenAi, body).unwrap();
        assert_eq!(c.content, "hi");
        assert_eq!(c.tokens_used, Some(TokenUsage { input: 5, output: 1 }));
    }

    #[test]
    fn test_parse_google_response_without_usage() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"yo"}]}}]}"#;
        let c = parse_response(Provider::Google, body).unwrap();
        assert_eq!(c.content, "yo");
        assert_eq!(c.tokens_used, None);
    }

    #[test]
    fn test_parse_empty_choices_is_empty_content() {
        let err = parse_response(Provider::OpenAi, r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error":{"type":"overloaded","message":"Overloaded"}}"#),
            "Overloaded"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }
}
