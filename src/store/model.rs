//! Data model for the mock inbox and prompt configuration.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

// ── Category ────────────────────────────────────────────────────────

/// Closed set of categories the classifier can assign.
///
/// An unprocessed email has no category (`Option<Category>::None` on the
/// record); there is no "unknown" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Important,
    #[serde(rename = "To-Do")]
    ToDo,
    Newsletter,
    Spam,
}

impl Category {
    /// Display string, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Important => "Important",
            Self::ToDo => "To-Do",
            Self::Newsletter => "Newsletter",
            Self::Spam => "Spam",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Action items ────────────────────────────────────────────────────

/// Sentinel deadline value meaning "no deadline was found".
pub const NO_DEADLINE: &str = "None";

/// A single extracted (task, deadline) pair.
///
/// This is the only representation of an action item anywhere in the
/// crate; records never hold raw maps or untyped values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    /// The actionable request extracted from the email.
    pub task: String,
    /// Free-form deadline text, or the literal `"None"`.
    pub deadline: String,
}

impl ActionItem {
    pub fn new(task: impl Into<String>, deadline: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            deadline: deadline.into(),
        }
    }

    /// Whether a concrete deadline was extracted.
    pub fn has_deadline(&self) -> bool {
        self.deadline != NO_DEADLINE
    }

    fn validate(&self) -> Result<(), String> {
        if self.task.trim().is_empty() {
            return Err("action item has an empty task".into());
        }
        if self.deadline.is_empty() {
            return Err("action item has an empty deadline (use \"None\")".into());
        }
        Ok(())
    }
}

// ── Email records ───────────────────────────────────────────────────

/// A single email in the mock inbox.
///
/// Raw fields come from the inbox asset; the processed fields (`category`,
/// `action_items`, `draft_reply`) are filled by the ingestion pipeline and
/// start empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: u32,
    pub sender: String,
    pub subject: String,
    /// ISO-8601 timestamp string, kept verbatim from the asset.
    pub timestamp: String,
    pub body: String,
    #[serde(default)]
    pub is_read: bool,

    /// Assigned category; `None` until the email has been processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Extracted tasks, in extraction order.
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    /// Auto-drafted reply; empty means no reply recommended or not yet drafted.
    #[serde(default)]
    pub draft_reply: String,
}

impl EmailRecord {
    /// Validate a freshly loaded record. Called once at load time; a bad
    /// record halts startup rather than serving corrupt state.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.sender.trim().is_empty() {
            return Err(StoreError::InvalidEmail {
                id: self.id,
                reason: "empty sender".into(),
            });
        }
        for item in &self.action_items {
            if let Err(reason) = item.validate() {
                return Err(StoreError::InvalidEmail {
                    id: self.id,
                    reason,
                });
            }
        }
        Ok(())
    }
}

// ── Prompt templates ────────────────────────────────────────────────

/// Declared output format of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// A single named prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    pub description: String,
    /// The full prompt text sent to the LLM (the email body is appended).
    pub template: String,
    pub output_format: OutputFormat,
    /// Required JSON structure when `output_format` is `json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<String>,
}

impl PromptTemplate {
    fn validate(&self, key: &str) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::InvalidPrompts(format!("{key}: empty name")));
        }
        if self.template.trim().is_empty() {
            return Err(StoreError::InvalidPrompts(format!(
                "{key}: empty template"
            )));
        }
        if self.output_format == OutputFormat::Json && self.json_schema.is_none() {
            return Err(StoreError::InvalidPrompts(format!(
                "{key}: json output declared but no json_schema given"
            )));
        }
        Ok(())
    }
}

/// Well-known prompt keys.
pub const CATEGORIZATION_PROMPT: &str = "Categorization_Prompt";
pub const ACTION_EXTRACTION_PROMPT: &str = "Action_Extraction_Prompt";
pub const AUTO_REPLY_PROMPT: &str = "Auto_Reply_Prompt";

/// The full set of prompts driving the LLM path.
///
/// Edits go through [`PromptConfiguration::with_template`], which
/// re-validates the whole configuration and rejects the edit atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfiguration {
    #[serde(rename = "Categorization_Prompt")]
    pub categorization: PromptTemplate,
    #[serde(rename = "Action_Extraction_Prompt")]
    pub action_extraction: PromptTemplate,
    #[serde(rename = "Auto_Reply_Prompt")]
    pub auto_reply: PromptTemplate,
}

impl PromptConfiguration {
    /// Validate every template in the configuration.
    pub fn validate(&self) -> Result<(), StoreError> {
        self.categorization.validate(CATEGORIZATION_PROMPT)?;
        self.action_extraction.validate(ACTION_EXTRACTION_PROMPT)?;
        self.auto_reply.validate(AUTO_REPLY_PROMPT)?;
        Ok(())
    }

    /// Look up a template by its well-known key.
    pub fn get(&self, key: &str) -> Option<&PromptTemplate> {
        match key {
            CATEGORIZATION_PROMPT => Some(&self.categorization),
            ACTION_EXTRACTION_PROMPT => Some(&self.action_extraction),
            AUTO_REPLY_PROMPT => Some(&self.auto_reply),
            _ => None,
        }
    }

    /// Return a copy with one template's text replaced, re-validated as a
    /// whole. On validation failure the error is returned and the caller's
    /// configuration is left untouched.
    pub fn with_template(&self, key: &str, new_template: &str) -> Result<Self, StoreError> {
        let mut updated = self.clone();
        let slot = match key {
            CATEGORIZATION_PROMPT => &mut updated.categorization,
            ACTION_EXTRACTION_PROMPT => &mut updated.action_extraction,
            AUTO_REPLY_PROMPT => &mut updated.auto_reply,
            other => return Err(StoreError::UnknownPrompt(other.to_string())),
        };
        slot.template = new_template.to_string();
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str) -> PromptTemplate {
        PromptTemplate {
            name: name.into(),
            description: "test".into(),
            template: "Do the thing.".into(),
            output_format: OutputFormat::Text,
            json_schema: None,
        }
    }

    fn config() -> PromptConfiguration {
        PromptConfiguration {
            categorization: template("Categorization"),
            action_extraction: PromptTemplate {
                output_format: OutputFormat::Json,
                json_schema: Some(r#"{"action_items": []}"#.into()),
                ..template("Action Extraction")
            },
            auto_reply: template("Auto Reply"),
        }
    }

    #[test]
    fn category_serializes_with_hyphenated_todo() {
        let json = serde_json::to_string(&Category::ToDo).unwrap();
        assert_eq!(json, r#""To-Do""#);
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::ToDo);
        assert_eq!(Category::ToDo.to_string(), "To-Do");
    }

    #[test]
    fn action_item_round_trips_exactly() {
        let item = ActionItem::new("Review and respond to: Q3 budget", "EOD today");
        let json = serde_json::to_string(&item).unwrap();
        let back: ActionItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);

        let none = ActionItem::new("Complete task: Update deck", NO_DEADLINE);
        assert!(!none.has_deadline());
        let back: ActionItem =
            serde_json::from_str(&serde_json::to_string(&none).unwrap()).unwrap();
        assert_eq!(back.deadline, "None");
    }

    #[test]
    fn email_record_defaults_unprocessed() {
        let json = r#"{
            "id": 1,
            "sender": "alice@co.com",
            "subject": "Hello",
            "timestamp": "2025-01-05T09:00:00",
            "body": "Hi there"
        }"#;
        let email: EmailRecord = serde_json::from_str(json).unwrap();
        assert!(email.category.is_none());
        assert!(email.action_items.is_empty());
        assert!(email.draft_reply.is_empty());
        assert!(!email.is_read);
        email.validate().unwrap();
    }

    #[test]
    fn email_with_empty_task_fails_validation() {
        let email = EmailRecord {
            id: 7,
            sender: "bob@co.com".into(),
            subject: "x".into(),
            timestamp: "2025-01-05T09:00:00".into(),
            body: "y".into(),
            is_read: false,
            category: None,
            action_items: vec![ActionItem::new("", "ASAP")],
            draft_reply: String::new(),
        };
        assert!(matches!(
            email.validate(),
            Err(StoreError::InvalidEmail { id: 7, .. })
        ));
    }

    #[test]
    fn prompt_configuration_validates() {
        config().validate().unwrap();
    }

    #[test]
    fn prompt_edit_rejected_leaves_original_intact() {
        let original = config();
        let result = original.with_template(CATEGORIZATION_PROMPT, "   ");
        assert!(matches!(result, Err(StoreError::InvalidPrompts(_))));
        // Caller's configuration unchanged.
        assert_eq!(original.categorization.template, "Do the thing.");
    }

    #[test]
    fn prompt_edit_unknown_key_rejected() {
        let result = config().with_template("Summarize_Prompt", "text");
        assert!(matches!(result, Err(StoreError::UnknownPrompt(_))));
    }

    #[test]
    fn prompt_edit_applies() {
        let updated = config()
            .with_template(AUTO_REPLY_PROMPT, "Reply politely.")
            .unwrap();
        assert_eq!(updated.auto_reply.template, "Reply politely.");
    }

    #[test]
    fn json_format_requires_schema() {
        let mut cfg = config();
        cfg.action_extraction.json_schema = None;
        assert!(matches!(
            cfg.validate(),
            Err(StoreError::InvalidPrompts(_))
        ));
    }
}
