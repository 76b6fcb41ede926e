//! Explicit chat session state.
//!
//! The selected email and conversation history live in one struct that is
//! passed into handlers, with named transitions and no ambient globals.

use chrono::{DateTime, Utc};

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in the conversation.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// Per-session UI state: the selected email and the chat transcript.
#[derive(Debug, Default)]
pub struct SessionState {
    selected_email: Option<u32>,
    history: Vec<ChatTurn>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected email id, if any.
    pub fn selected_email(&self) -> Option<u32> {
        self.selected_email
    }

    pub fn select_email(&mut self, id: u32) {
        self.selected_email = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected_email = None;
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(ChatTurn {
            role: ChatRole::User,
            content: content.into(),
            at: Utc::now(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(ChatTurn {
            role: ChatRole::Assistant,
            content: content.into(),
            at: Utc::now(),
        });
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_transitions() {
        let mut session = SessionState::new();
        assert!(session.selected_email().is_none());
        session.select_email(3);
        assert_eq!(session.selected_email(), Some(3));
        session.clear_selection();
        assert!(session.selected_email().is_none());
    }

    #[test]
    fn history_records_turns_in_order() {
        let mut session = SessionState::new();
        session.push_user("draft a reply");
        session.push_assistant("Draft Generated");
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].role, ChatRole::User);
        assert_eq!(session.history()[1].role, ChatRole::Assistant);

        session.clear_history();
        assert!(session.history().is_empty());
    }
}
