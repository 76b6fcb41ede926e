//! HTTP-backed LLM providers for Anthropic and OpenAI.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::error::LlmError;
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider, Role};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const DEFAULT_MAX_TOKENS: u32 = 1024;

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

fn status_error(provider: &str, status: reqwest::StatusCode, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthFailed {
            provider: provider.to_string(),
        },
        429 => LlmError::RateLimited {
            provider: provider.to_string(),
            retry_after: None,
        },
        _ => LlmError::RequestFailed {
            provider: provider.to_string(),
            reason: format!("HTTP {status}: {body}"),
        },
    }
}

// ── Anthropic ───────────────────────────────────────────────────────

/// Anthropic Messages API provider.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: SecretString, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            model: model.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let (system, messages) = request.split_system();

        let mut body = json!({
            "model": self.model,
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": messages
                .iter()
                .map(|m| json!({
                    "role": if m.role == Role::Assistant { "assistant" } else { "user" },
                    "content": m.content,
                }))
                .collect::<Vec<_>>(),
        });
        if let Some(system) = system {
            body["system"] = json!(system);
        }
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error("anthropic", status, body));
        }

        let parsed: AnthropicResponse = response.json().await?;
        let content = parsed
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: "anthropic".to_string(),
                reason: "empty content array".to_string(),
            })?;

        Ok(CompletionResponse {
            content,
            input_tokens: parsed.usage.input_tokens,
            output_tokens: parsed.usage.output_tokens,
        })
    }
}

// ── OpenAI ──────────────────────────────────────────────────────────

/// OpenAI Chat Completions API provider.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: SecretString, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            model: model.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: OpenAiUsage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error("openai", status, body));
        }

        let parsed: OpenAiResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: "openai".to_string(),
                reason: "no choices returned".to_string(),
            })?;

        Ok(CompletionResponse {
            content: choice.message.content,
            input_tokens: parsed.usage.prompt_tokens,
            output_tokens: parsed.usage.completion_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn providers_construct_without_network() {
        // Auth failures only surface when a request is made.
        let anthropic = AnthropicProvider::new(
            SecretString::from("test-key"),
            "claude-sonnet-4-20250514",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(anthropic.model_name(), "claude-sonnet-4-20250514");

        let openai =
            OpenAiProvider::new(SecretString::from("sk-test"), "gpt-4o", Duration::from_secs(5))
                .unwrap();
        assert_eq!(openai.model_name(), "gpt-4o");
    }

    #[test]
    fn status_error_maps_auth_and_rate_limit() {
        let err = status_error("anthropic", reqwest::StatusCode::UNAUTHORIZED, String::new());
        assert!(matches!(err, LlmError::AuthFailed { .. }));

        let err = status_error(
            "openai",
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            String::new(),
        );
        assert!(matches!(err, LlmError::RateLimited { .. }));

        let err = status_error(
            "openai",
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_string(),
        );
        assert!(matches!(err, LlmError::RequestFailed { .. }));
    }
}
