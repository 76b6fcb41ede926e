//! Query router: dispatches a free-text chat query to the right handler.
//!
//! Rules are evaluated in order, first match wins:
//! 1. selected email + "draft a reply" → drafter (draft is saved back)
//! 2. selected email + "tasks"         → stored action items
//! 3. selected email + "summarize"     → analyzer summarization
//! 4. "show me all" / "urgent emails"  → category-filtered listing
//! 5. everything else                  → analyzer passthrough
//!
//! Any analyzer failure becomes a fixed user-visible string; the caller
//! never sees an error.

use std::sync::Arc;

use tracing::warn;

use crate::analyzer::EmailAnalyzer;
use crate::chat::session::SessionState;
use crate::store::{Category, EmailRecord, InboxStore};

/// Shown whenever the analyzer fails mid-chat. The conversation continues.
const CHAT_ERROR_REPLY: &str = "Sorry, I encountered an error while processing your request.";

/// Routes chat queries to the drafter, stored results, or the analyzer.
pub struct QueryRouter {
    analyzer: Arc<dyn EmailAnalyzer>,
}

impl QueryRouter {
    pub fn new(analyzer: Arc<dyn EmailAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Answer a query against the current session. Always returns a
    /// user-facing string.
    pub async fn respond(
        &self,
        store: &mut InboxStore,
        session: &SessionState,
        query: &str,
    ) -> String {
        let query_lower = query.to_lowercase();

        let selected = session.selected_email().and_then(|id| {
            let email = store.email(id).cloned();
            if email.is_none() {
                warn!(id, "Selected email no longer present");
            }
            email
        });

        if let Some(ref email) = selected {
            if query_lower.contains("draft a reply") {
                return self.draft_for(store, email).await;
            }

            if query_lower.contains("tasks") {
                return render_tasks(email);
            }

            if query_lower.contains("summarize") {
                let instruction = format!("Summarize the following email concisely. {query}");
                return match self.analyzer.answer(&instruction, Some(email)).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(error = %e, "Summarization failed");
                        CHAT_ERROR_REPLY.to_string()
                    }
                };
            }
        }

        if query_lower.contains("show me all") || query_lower.contains("urgent emails") {
            let target = if query_lower.contains("urgent") {
                Category::Important
            } else {
                Category::ToDo
            };
            return render_category_listing(store, target);
        }

        match self.analyzer.answer(query, selected.as_ref()).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Chat passthrough failed");
                CHAT_ERROR_REPLY.to_string()
            }
        }
    }

    /// Generate (and persist) a fresh draft for the selected email.
    async fn draft_for(&self, store: &mut InboxStore, email: &EmailRecord) -> String {
        let prompts = store.prompts().clone();
        let draft = self.analyzer.draft_reply(email, &prompts).await;
        if let Err(e) = store.save_email_state(email.id, None, None, Some(draft.clone())) {
            warn!(id = email.id, error = %e, "Failed to persist chat-generated draft");
        }
        format!("**Draft Generated:**\n\n{draft}")
    }
}

/// Render an email's stored action items as a bulleted list.
fn render_tasks(email: &EmailRecord) -> String {
    if email.action_items.is_empty() {
        return "No specific action items were extracted for this email.".to_string();
    }
    let list = email
        .action_items
        .iter()
        .map(|item| format!("- {} (Deadline: {})", item.task, item.deadline))
        .collect::<Vec<_>>()
        .join("\n");
    format!("The extracted tasks from this email are:\n{list}")
}

/// Render all emails in a category, or a "none found" message.
fn render_category_listing(store: &InboxStore, category: Category) -> String {
    let matches = store.emails_in(category);
    if matches.is_empty() {
        return format!("No emails currently categorized as **{category}**.");
    }
    let mut summary = format!(
        "Found {} emails categorized as **{category}**:\n",
        matches.len()
    );
    summary.push_str(
        &matches
            .iter()
            .map(|e| format!("- ID {}: {}", e.id, e.subject))
            .collect::<Vec<_>>()
            .join("\n"),
    );
    summary
}
