//! LLM integration for Inbox Assist.
//!
//! Supports:
//! - **Anthropic**: Messages API over HTTP
//! - **OpenAI**: Chat Completions API over HTTP
//!
//! Providers implement the `LlmProvider` trait and are selected once at
//! construction time; the rest of the agent only sees `Arc<dyn LlmProvider>`.

pub mod http;
pub mod provider;

pub use http::{AnthropicProvider, OpenAiProvider};
pub use provider::{ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role};

use std::sync::Arc;
use std::time::Duration;

use crate::error::LlmError;

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Anthropic,
    OpenAi,
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub request_timeout: Duration,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.backend {
        LlmBackend::Anthropic => {
            let provider = AnthropicProvider::new(
                config.api_key.clone(),
                &config.model,
                config.request_timeout,
            )?;
            tracing::info!("Using Anthropic (model: {})", config.model);
            Ok(Arc::new(provider))
        }
        LlmBackend::OpenAi => {
            let provider = OpenAiProvider::new(
                config.api_key.clone(),
                &config.model,
                config.request_timeout,
            )?;
            tracing::info!("Using OpenAI (model: {})", config.model);
            Ok(Arc::new(provider))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_provider_anthropic() {
        let config = LlmConfig {
            backend: LlmBackend::Anthropic,
            api_key: secrecy::SecretString::from("test-key"),
            model: "claude-sonnet-4-20250514".to_string(),
            request_timeout: Duration::from_secs(5),
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn create_provider_openai() {
        let config = LlmConfig {
            backend: LlmBackend::OpenAi,
            api_key: secrecy::SecretString::from("sk-test"),
            model: "gpt-4o".to_string(),
            request_timeout: Duration::from_secs(5),
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "gpt-4o");
    }
}
