//! Email/prompt storage: data model and the in-memory store.

pub mod inbox;
pub mod model;

pub use inbox::InboxStore;
pub use model::{
    ActionItem, Category, EmailRecord, OutputFormat, PromptConfiguration, PromptTemplate,
    ACTION_EXTRACTION_PROMPT, AUTO_REPLY_PROMPT, CATEGORIZATION_PROMPT, NO_DEADLINE,
};
