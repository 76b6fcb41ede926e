//! The analysis seam: one trait, two interchangeable implementations.
//!
//! `RuleAnalyzer` is the deterministic rule engine ("mock mode").
//! `LlmAnalyzer` drives the prompt templates through an `LlmProvider` and
//! falls back to the rule engine on any provider or parse failure; the
//! ingestion operations never surface an LLM error to their callers.
//!
//! Which implementation runs is decided once at construction time; nothing
//! downstream null-checks a provider handle.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::engine;
use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};
use crate::store::{ActionItem, Category, EmailRecord, PromptConfiguration};

/// Temperature for analysis calls (deterministic-ish).
const ANALYZE_TEMPERATURE: f32 = 0.0;

/// Max tokens per analysis call (three calls per email).
const ANALYZE_MAX_TOKENS: u32 = 512;

/// Analysis operations the pipeline and chat router depend on.
///
/// `categorize`, `extract_actions`, and `draft_reply` are total; the LLM
/// implementation recovers internally. `answer` may fail; the chat router
/// converts that into a user-facing error string.
#[async_trait]
pub trait EmailAnalyzer: Send + Sync {
    /// Short mode label for logging ("rules" or "llm").
    fn mode(&self) -> &'static str;

    async fn categorize(&self, email: &EmailRecord, prompts: &PromptConfiguration) -> Category;

    async fn extract_actions(
        &self,
        email: &EmailRecord,
        prompts: &PromptConfiguration,
    ) -> Vec<ActionItem>;

    async fn draft_reply(&self, email: &EmailRecord, prompts: &PromptConfiguration) -> String;

    /// Free-form question answering with optional email context.
    async fn answer(&self, query: &str, email: Option<&EmailRecord>) -> Result<String, LlmError>;
}

// ── Rule-based implementation ───────────────────────────────────────

/// Pure rule-engine analyzer, used when no API key is configured.
pub struct RuleAnalyzer;

#[async_trait]
impl EmailAnalyzer for RuleAnalyzer {
    fn mode(&self) -> &'static str {
        "rules"
    }

    async fn categorize(&self, email: &EmailRecord, _prompts: &PromptConfiguration) -> Category {
        engine::classify(&email.subject, &email.body, &email.sender)
    }

    async fn extract_actions(
        &self,
        email: &EmailRecord,
        _prompts: &PromptConfiguration,
    ) -> Vec<ActionItem> {
        engine::extract(&email.subject, &email.body)
    }

    async fn draft_reply(&self, email: &EmailRecord, _prompts: &PromptConfiguration) -> String {
        engine::draft(&email.subject, &email.body)
    }

    async fn answer(&self, query: &str, email: Option<&EmailRecord>) -> Result<String, LlmError> {
        // Deterministic placeholder naming the query and selection.
        Ok(match email {
            Some(email) => format!(
                "Mock response for query: '{query}'. Email {id} was used as context.",
                id = email.id
            ),
            None => format!("Mock response for query: '{query}'. No email was selected."),
        })
    }
}

// ── LLM-backed implementation ───────────────────────────────────────

/// Prompt-template driven analyzer over an `LlmProvider`.
pub struct LlmAnalyzer {
    llm: Arc<dyn LlmProvider>,
    fallback: RuleAnalyzer,
}

impl LlmAnalyzer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            fallback: RuleAnalyzer,
        }
    }

    async fn complete_template(
        &self,
        template: &str,
        email_body: &str,
        extra: Option<&str>,
    ) -> Result<String, LlmError> {
        let mut prompt = format!("{template}\n\nEMAIL CONTENT: {email_body}");
        if let Some(extra) = extra {
            prompt.push_str("\n\n");
            prompt.push_str(extra);
        }

        let request = CompletionRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(ANALYZE_TEMPERATURE)
            .with_max_tokens(ANALYZE_MAX_TOKENS);

        let response = self.llm.complete(request).await?;
        Ok(response.content.trim().to_string())
    }
}

#[async_trait]
impl EmailAnalyzer for LlmAnalyzer {
    fn mode(&self) -> &'static str {
        "llm"
    }

    async fn categorize(&self, email: &EmailRecord, prompts: &PromptConfiguration) -> Category {
        let result = self
            .complete_template(&prompts.categorization.template, &email.body, None)
            .await;

        match result {
            Ok(raw) => match parse_category(&raw) {
                Some(category) => {
                    debug!(id = email.id, %category, "LLM categorization");
                    category
                }
                None => {
                    warn!(id = email.id, raw = %raw, "Unrecognized category, using rules");
                    self.fallback.categorize(email, prompts).await
                }
            },
            Err(e) => {
                warn!(id = email.id, error = %e, "LLM categorization failed, using rules");
                self.fallback.categorize(email, prompts).await
            }
        }
    }

    async fn extract_actions(
        &self,
        email: &EmailRecord,
        prompts: &PromptConfiguration,
    ) -> Vec<ActionItem> {
        let format_instructions = prompts
            .action_extraction
            .json_schema
            .as_deref()
            .map(|schema| format!("Respond with ONLY a JSON object matching: {schema}"));

        let result = self
            .complete_template(
                &prompts.action_extraction.template,
                &email.body,
                format_instructions.as_deref(),
            )
            .await;

        match result {
            Ok(raw) => match parse_action_items(&raw) {
                Ok(items) => {
                    debug!(id = email.id, count = items.len(), "LLM action extraction");
                    items
                }
                Err(e) => {
                    warn!(id = email.id, error = %e, "Unparsable action items, using rules");
                    self.fallback.extract_actions(email, prompts).await
                }
            },
            Err(e) => {
                warn!(id = email.id, error = %e, "LLM extraction failed, using rules");
                self.fallback.extract_actions(email, prompts).await
            }
        }
    }

    async fn draft_reply(&self, email: &EmailRecord, prompts: &PromptConfiguration) -> String {
        match self
            .complete_template(&prompts.auto_reply.template, &email.body, None)
            .await
        {
            Ok(draft) => draft,
            Err(e) => {
                warn!(id = email.id, error = %e, "LLM drafting failed, using rules");
                self.fallback.draft_reply(email, prompts).await
            }
        }
    }

    async fn answer(&self, query: &str, email: Option<&EmailRecord>) -> Result<String, LlmError> {
        let mut user = query.to_string();
        if let Some(email) = email {
            user.push_str(&format!(
                "\n\n--- SELECTED EMAIL CONTENT ---\nSubject: {}\nBody: {}",
                email.subject, email.body
            ));
        }

        let request = CompletionRequest::new(vec![
            ChatMessage::system(
                "You are an intelligent Email Agent. Use the provided email content to \
                 answer the user's question. If no email is provided, answer generally.",
            ),
            ChatMessage::user(user),
        ])
        .with_max_tokens(ANALYZE_MAX_TOKENS);

        let response = self.llm.complete(request).await?;
        Ok(response.content.trim().to_string())
    }
}

// ── Response parsing ────────────────────────────────────────────────

/// Map a raw LLM categorization reply onto the closed category set.
fn parse_category(raw: &str) -> Option<Category> {
    let lower = raw.trim().to_lowercase();
    // Exact answers first, then labels buried in a longer sentence.
    match lower.as_str() {
        "important" => return Some(Category::Important),
        "to-do" | "todo" => return Some(Category::ToDo),
        "newsletter" => return Some(Category::Newsletter),
        "spam" => return Some(Category::Spam),
        _ => {}
    }
    if lower.contains("to-do") {
        Some(Category::ToDo)
    } else if lower.contains("spam") {
        Some(Category::Spam)
    } else if lower.contains("important") {
        Some(Category::Important)
    } else if lower.contains("newsletter") {
        Some(Category::Newsletter)
    } else {
        None
    }
}

#[derive(Debug, serde::Deserialize)]
struct ActionItemList {
    action_items: Vec<ActionItem>,
}

/// Parse the extraction reply: a JSON object `{"action_items": [...]}`,
/// possibly wrapped in markdown or surrounding prose.
fn parse_action_items(raw: &str) -> Result<Vec<ActionItem>, String> {
    let json_str = extract_json_object(raw);
    let wrapper: ActionItemList =
        serde_json::from_str(&json_str).map_err(|e| format!("JSON parse error: {e}"))?;
    for item in &wrapper.action_items {
        if item.task.trim().is_empty() {
            return Err("action item with empty task".into());
        }
    }
    Ok(wrapper.action_items)
}

/// Extract a JSON object from LLM output (handles markdown wrapping).
fn extract_json_object(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim().to_string();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return inner.to_string();
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}
