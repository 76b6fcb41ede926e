//! In-memory inbox store: loads the mock inbox and prompt configuration
//! from JSON assets and serves lookups/updates to the rest of the agent.
//!
//! Loading is all-or-nothing: any malformed record or template halts
//! startup. Nothing here touches disk after `load`.

use std::path::Path;

use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::model::{ActionItem, Category, EmailRecord, PromptConfiguration};

/// Holds the email records and prompt templates for one session.
pub struct InboxStore {
    emails: Vec<EmailRecord>,
    prompts: PromptConfiguration,
}

impl InboxStore {
    /// Load and validate both assets.
    pub fn load(inbox_path: &Path, prompts_path: &Path) -> Result<Self, StoreError> {
        let emails = load_emails(inbox_path)?;
        let prompts = load_prompts(prompts_path)?;
        info!(emails = emails.len(), "Inbox store loaded");
        Ok(Self { emails, prompts })
    }

    /// Build a store from already-validated parts (used by tests and the
    /// integration harness).
    pub fn from_parts(
        emails: Vec<EmailRecord>,
        prompts: PromptConfiguration,
    ) -> Result<Self, StoreError> {
        for email in &emails {
            email.validate()?;
        }
        prompts.validate()?;
        Ok(Self { emails, prompts })
    }

    /// All emails, in load order.
    pub fn emails(&self) -> &[EmailRecord] {
        &self.emails
    }

    /// Ids of all emails, in load order.
    pub fn email_ids(&self) -> Vec<u32> {
        self.emails.iter().map(|e| e.id).collect()
    }

    /// Look up an email by id. A miss is an explicit `None`, not an error.
    pub fn email(&self, id: u32) -> Option<&EmailRecord> {
        self.emails.iter().find(|e| e.id == id)
    }

    /// All emails currently assigned the given category.
    pub fn emails_in(&self, category: Category) -> Vec<&EmailRecord> {
        self.emails
            .iter()
            .filter(|e| e.category == Some(category))
            .collect()
    }

    /// Current prompt configuration.
    pub fn prompts(&self) -> &PromptConfiguration {
        &self.prompts
    }

    /// Write processed outputs back onto an email. Each field is only
    /// touched when given, so a chat-triggered re-draft does not clobber
    /// the stored category or action items.
    pub fn save_email_state(
        &mut self,
        id: u32,
        category: Option<Category>,
        action_items: Option<Vec<ActionItem>>,
        draft_reply: Option<String>,
    ) -> Result<(), StoreError> {
        let email = self
            .emails
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::EmailNotFound(id))?;
        if let Some(category) = category {
            email.category = Some(category);
        }
        if let Some(items) = action_items {
            email.action_items = items;
        }
        if let Some(draft) = draft_reply {
            email.draft_reply = draft;
        }
        debug!(id, "Saved processed email state");
        Ok(())
    }

    /// Replace one prompt's template text. The whole configuration is
    /// re-validated first; on failure the previous configuration stays in
    /// place and the error is returned.
    pub fn update_prompt_template(
        &mut self,
        key: &str,
        new_template: &str,
    ) -> Result<(), StoreError> {
        let updated = self.prompts.with_template(key, new_template)?;
        self.prompts = updated;
        info!(prompt = key, "Prompt template updated");
        Ok(())
    }
}

fn load_emails(path: &Path) -> Result<Vec<EmailRecord>, StoreError> {
    if !path.exists() {
        return Err(StoreError::AssetNotFound(path.display().to_string()));
    }
    let raw = std::fs::read_to_string(path)?;
    let emails: Vec<EmailRecord> =
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    for email in &emails {
        email.validate()?;
    }
    Ok(emails)
}

fn load_prompts(path: &Path) -> Result<PromptConfiguration, StoreError> {
    if !path.exists() {
        return Err(StoreError::AssetNotFound(path.display().to_string()));
    }
    let raw = std::fs::read_to_string(path)?;
    let prompts: PromptConfiguration =
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    prompts.validate()?;
    Ok(prompts)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::store::model::{OutputFormat, PromptTemplate, NO_DEADLINE};

    fn sample_prompts() -> PromptConfiguration {
        PromptConfiguration {
            categorization: PromptTemplate {
                name: "Categorization".into(),
                description: "Assigns a category".into(),
                template: "Categorize this email.".into(),
                output_format: OutputFormat::Text,
                json_schema: None,
            },
            action_extraction: PromptTemplate {
                name: "Action Extraction".into(),
                description: "Extracts tasks".into(),
                template: "Extract action items.".into(),
                output_format: OutputFormat::Json,
                json_schema: Some(r#"{"action_items":[{"task":"","deadline":""}]}"#.into()),
            },
            auto_reply: PromptTemplate {
                name: "Auto Reply".into(),
                description: "Drafts a reply".into(),
                template: "Draft a reply.".into(),
                output_format: OutputFormat::Text,
                json_schema: None,
            },
        }
    }

    fn sample_email(id: u32) -> EmailRecord {
        EmailRecord {
            id,
            sender: "alice@co.com".into(),
            subject: format!("Subject {id}"),
            timestamp: "2025-01-05T09:00:00".into(),
            body: "Hello".into(),
            is_read: false,
            category: None,
            action_items: Vec::new(),
            draft_reply: String::new(),
        }
    }

    fn store() -> InboxStore {
        InboxStore::from_parts(vec![sample_email(1), sample_email(2)], sample_prompts()).unwrap()
    }

    #[test]
    fn lookup_miss_is_none() {
        let store = store();
        assert!(store.email(1).is_some());
        assert!(store.email(99).is_none());
    }

    #[test]
    fn save_email_state_updates_only_given_fields() {
        let mut store = store();
        store
            .save_email_state(
                1,
                Some(Category::ToDo),
                Some(vec![ActionItem::new("Confirm attendance", NO_DEADLINE)]),
                Some("Thanks!".into()),
            )
            .unwrap();

        // Re-draft only; category and items must survive.
        store
            .save_email_state(1, None, None, Some("Updated draft".into()))
            .unwrap();

        let email = store.email(1).unwrap();
        assert_eq!(email.category, Some(Category::ToDo));
        assert_eq!(email.action_items.len(), 1);
        assert_eq!(email.draft_reply, "Updated draft");
    }

    #[test]
    fn save_email_state_unknown_id_errors() {
        let mut store = store();
        assert!(matches!(
            store.save_email_state(42, Some(Category::Spam), None, None),
            Err(StoreError::EmailNotFound(42))
        ));
    }

    #[test]
    fn emails_in_filters_by_category() {
        let mut store = store();
        store
            .save_email_state(2, Some(Category::Important), None, None)
            .unwrap();
        let important = store.emails_in(Category::Important);
        assert_eq!(important.len(), 1);
        assert_eq!(important[0].id, 2);
        assert!(store.emails_in(Category::Spam).is_empty());
    }

    #[test]
    fn prompt_update_rejection_keeps_previous_config() {
        let mut store = store();
        let before = store.prompts().categorization.template.clone();
        let result = store.update_prompt_template("Categorization_Prompt", "");
        assert!(result.is_err());
        assert_eq!(store.prompts().categorization.template, before);

        store
            .update_prompt_template("Categorization_Prompt", "New text.")
            .unwrap();
        assert_eq!(store.prompts().categorization.template, "New text.");
    }

    #[test]
    fn load_rejects_malformed_inbox() {
        let dir = tempfile::tempdir().unwrap();
        let inbox = dir.path().join("inbox.json");
        let prompts = dir.path().join("prompts.json");

        // An action item with an empty task is invalid at load time.
        let mut f = std::fs::File::create(&inbox).unwrap();
        write!(
            f,
            r#"[{{"id":1,"sender":"a@b.c","subject":"s","timestamp":"t","body":"b",
                 "action_items":[{{"task":"","deadline":"ASAP"}}]}}]"#
        )
        .unwrap();
        std::fs::write(
            &prompts,
            serde_json::to_string(&sample_prompts()).unwrap(),
        )
        .unwrap();

        let result = InboxStore::load(&inbox, &prompts);
        assert!(matches!(result, Err(StoreError::InvalidEmail { id: 1, .. })));
    }

    #[test]
    fn load_missing_asset_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = InboxStore::load(
            &dir.path().join("nope.json"),
            &dir.path().join("also-nope.json"),
        );
        assert!(matches!(result, Err(StoreError::AssetNotFound(_))));
    }

    #[test]
    fn load_round_trips_action_items() {
        let dir = tempfile::tempdir().unwrap();
        let inbox = dir.path().join("inbox.json");
        let prompts = dir.path().join("prompts.json");

        let mut email = sample_email(1);
        email.action_items = vec![
            ActionItem::new("Review and respond to: Budget", "None"),
            ActionItem::new("Confirm attendance/action for: Budget", "EOD today"),
        ];
        std::fs::write(&inbox, serde_json::to_string(&vec![email.clone()]).unwrap()).unwrap();
        std::fs::write(&prompts, serde_json::to_string(&sample_prompts()).unwrap()).unwrap();

        let store = InboxStore::load(&inbox, &prompts).unwrap();
        assert_eq!(store.email(1).unwrap().action_items, email.action_items);
    }
}
