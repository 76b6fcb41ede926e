//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Agent name for identification.
    pub name: String,
    /// Path to the mock inbox JSON asset.
    pub inbox_path: PathBuf,
    /// Path to the default prompt configuration JSON asset.
    pub prompts_path: PathBuf,
    /// Model identifier for the LLM path.
    pub model: String,
    /// Per-request timeout for LLM calls.
    pub request_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "inbox-assist".to_string(),
            inbox_path: PathBuf::from("./assets/mock_inbox.json"),
            prompts_path: PathBuf::from("./assets/default_prompts.json"),
            model: "claude-sonnet-4-20250514".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AgentConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// `INBOX_ASSIST_INBOX`, `INBOX_ASSIST_PROMPTS`, `INBOX_ASSIST_MODEL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("INBOX_ASSIST_INBOX") {
            config.inbox_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("INBOX_ASSIST_PROMPTS") {
            config.prompts_path = PathBuf::from(path);
        }
        if let Ok(model) = std::env::var("INBOX_ASSIST_MODEL") {
            config.model = model;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_assets() {
        let config = AgentConfig::default();
        assert!(config.inbox_path.to_string_lossy().contains("mock_inbox"));
        assert!(config
            .prompts_path
            .to_string_lossy()
            .contains("default_prompts"));
        assert_eq!(config.name, "inbox-assist");
    }
}
