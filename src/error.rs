//! Error types for Inbox Assist.

use std::time::Duration;

/// Top-level error type for the agent.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Inbox/prompt store errors.
///
/// Malformed assets are a startup-time failure: the store refuses to serve
/// a partially loaded or invalid state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Required asset not found: {0}")]
    AssetNotFound(String),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid email record {id}: {reason}")]
    InvalidEmail { id: u32, reason: String },

    #[error("Invalid prompt configuration: {0}")]
    InvalidPrompts(String),

    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Email not found: {0}")]
    EmailNotFound(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Ingestion pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Categorization failed: {0}")]
    Categorization(String),

    #[error("Action extraction failed: {0}")]
    Extraction(String),

    #[error("Reply drafting failed: {0}")]
    Drafting(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Result type alias for the agent.
pub type Result<T> = std::result::Result<T, Error>;
