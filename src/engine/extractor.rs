//! Rule-based action item extractor: the deterministic substitute for the
//! LLM extraction call.
//!
//! Five independent, non-exclusive rules evaluated against the unmodified
//! subject/body. Each appends at most one item; output order equals rule
//! declaration order, so one email can yield several items.

use crate::store::{ActionItem, NO_DEADLINE};

/// Extract zero or more action items from an email. Never fails.
pub fn extract(subject: &str, body: &str) -> Vec<ActionItem> {
    let subject_lower = subject.to_lowercase();
    let body_lower = body.to_lowercase();

    let mut items = Vec::new();

    if subject_lower.contains("confirm") || body_lower.contains("confirm") {
        let deadline = if body_lower.contains("eod") {
            "EOD today"
        } else {
            "ASAP"
        };
        items.push(ActionItem::new(
            format!("Confirm attendance/action for: {subject}"),
            deadline,
        ));
    }

    if subject_lower.contains("update") || body_lower.contains("complete") {
        let deadline = if body_lower.contains("wednesday") {
            "Wednesday morning"
        } else {
            NO_DEADLINE
        };
        items.push(ActionItem::new(format!("Complete task: {subject}"), deadline));
    }

    if subject_lower.contains("review") || body_lower.contains("review") {
        items.push(ActionItem::new(
            format!("Review and respond to: {subject}"),
            NO_DEADLINE,
        ));
    }

    if subject_lower.contains("meeting") || subject_lower.contains("invitation") {
        items.push(ActionItem::new(
            format!("Respond to meeting invitation: {subject}"),
            "ASAP",
        ));
    }

    if subject_lower.contains("invoice") || body_lower.contains("payment") {
        let deadline = if body_lower.contains("friday") {
            "Friday"
        } else {
            "Next week"
        };
        items.push(ActionItem::new(
            format!("Process payment for: {subject}"),
            deadline,
        ));
    }

    items
}
