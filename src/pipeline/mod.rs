//! Ingestion pipeline: categorize → extract action items → draft reply,
//! per email, strictly sequentially.
//!
//! Each email is a clean slate: the three steps read only that email's raw
//! fields, and results are written back through the store. A failure on
//! one email is logged and the pass continues.

use std::sync::Arc;

use tracing::{error, info};

use crate::analyzer::EmailAnalyzer;
use crate::error::PipelineError;
use crate::store::InboxStore;

/// Outcome of one ingestion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionSummary {
    /// Emails fully processed and saved.
    pub processed: usize,
    /// Emails in the store when the pass started.
    pub total: usize,
}

/// Runs the three-step ingestion over the whole inbox.
pub struct IngestionPipeline {
    analyzer: Arc<dyn EmailAnalyzer>,
}

impl IngestionPipeline {
    pub fn new(analyzer: Arc<dyn EmailAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Process every email in the store, in load order.
    pub async fn run(&self, store: &mut InboxStore) -> IngestionSummary {
        let ids = store.email_ids();
        let total = ids.len();
        info!(total, mode = self.analyzer.mode(), "Running ingestion pipeline");

        let mut processed = 0;
        for id in ids {
            match self.process_email(store, id).await {
                Ok(()) => processed += 1,
                Err(e) => {
                    error!(id, error = %e, "Failed to process email");
                }
            }
        }

        info!(processed, total, "Ingestion pass complete");
        IngestionSummary { processed, total }
    }

    /// Run the three steps for a single email and save the results.
    pub async fn process_email(
        &self,
        store: &mut InboxStore,
        id: u32,
    ) -> Result<(), PipelineError> {
        let email = store
            .email(id)
            .cloned()
            .ok_or(crate::error::StoreError::EmailNotFound(id))?;
        let prompts = store.prompts().clone();

        let category = self.analyzer.categorize(&email, &prompts).await;
        let action_items = self.analyzer.extract_actions(&email, &prompts).await;
        let draft_reply = self.analyzer.draft_reply(&email, &prompts).await;

        info!(
            id,
            category = %category,
            actions = action_items.len(),
            drafted = !draft_reply.is_empty(),
            "Email processed"
        );

        store.save_email_state(id, Some(category), Some(action_items), Some(draft_reply))?;
        Ok(())
    }
}
