//! Calendar export: renders extracted tasks as iCalendar (.ics) text so
//! they can be imported into Google Calendar, Outlook, or Apple Calendar.

use chrono::{DateTime, Utc};

use crate::store::{ActionItem, Category, EmailRecord, InboxStore};

const PRODID: &str = "-//Inbox Assist//Task//EN";

/// iCalendar summaries are kept short.
const SUMMARY_MAX_CHARS: usize = 75;

/// A task paired with the email it came from.
#[derive(Debug, Clone)]
pub struct TaskEntry<'a> {
    pub email: &'a EmailRecord,
    /// Position of the item within its email, used in the event UID.
    pub index: usize,
    pub item: &'a ActionItem,
}

/// Collect every extracted task across the inbox, in email/load order.
pub fn collect_tasks(store: &InboxStore) -> Vec<TaskEntry<'_>> {
    store
        .emails()
        .iter()
        .flat_map(|email| {
            email
                .action_items
                .iter()
                .enumerate()
                .map(move |(index, item)| TaskEntry { email, index, item })
        })
        .collect()
}

/// Render one task as a complete single-event calendar.
pub fn single_task_calendar(entry: &TaskEntry<'_>, now: DateTime<Utc>) -> String {
    format!(
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:{PRODID}\r\n{}END:VCALENDAR\r\n",
        render_event(entry, now)
    )
}

/// Render all given tasks as one calendar with an event per task.
pub fn bulk_calendar(entries: &[TaskEntry<'_>], now: DateTime<Utc>) -> String {
    let mut out = format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:{PRODID}\r\n");
    for entry in entries {
        out.push_str(&render_event(entry, now));
    }
    out.push_str("END:VCALENDAR\r\n");
    out
}

fn render_event(entry: &TaskEntry<'_>, now: DateTime<Utc>) -> String {
    let email = entry.email;
    let summary: String = entry.item.task.chars().take(SUMMARY_MAX_CHARS).collect();
    let priority = if email.category == Some(Category::Important) {
        1
    } else {
        5
    };
    let category = email
        .category
        .map(|c| c.to_string())
        .unwrap_or_else(|| "Unprocessed".to_string());

    format!(
        "BEGIN:VEVENT\r\n\
         UID:task-{id}-{index}@inbox-assist\r\n\
         DTSTAMP:{stamp}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:From: {sender}\\n\\nEmail: {subject}\\n\\nDeadline: {deadline}\\n\\nCategory: {category}\r\n\
         STATUS:CONFIRMED\r\n\
         PRIORITY:{priority}\r\n\
         END:VEVENT\r\n",
        id = email.id,
        index = entry.index,
        stamp = now.format("%Y%m%dT%H%M%SZ"),
        sender = email.sender,
        subject = email.subject,
        deadline = entry.item.deadline,
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::store::model::{OutputFormat, PromptTemplate};
    use crate::store::PromptConfiguration;

    fn prompts() -> PromptConfiguration {
        PromptConfiguration {
            categorization: PromptTemplate {
                name: "Categorization".into(),
                description: "d".into(),
                template: "Categorize.".into(),
                output_format: OutputFormat::Text,
                json_schema: None,
            },
            action_extraction: PromptTemplate {
                name: "Action Extraction".into(),
                description: "d".into(),
                template: "Extract.".into(),
                output_format: OutputFormat::Json,
                json_schema: Some("{}".into()),
            },
            auto_reply: PromptTemplate {
                name: "Auto Reply".into(),
                description: "d".into(),
                template: "Reply.".into(),
                output_format: OutputFormat::Text,
                json_schema: None,
            },
        }
    }

    fn store() -> InboxStore {
        let mut important = EmailRecord {
            id: 1,
            sender: "boss@co.com".into(),
            subject: "Urgent: outage".into(),
            timestamp: "2025-01-05T09:00:00".into(),
            body: "down".into(),
            is_read: false,
            category: Some(Category::Important),
            action_items: vec![
                ActionItem::new("Confirm attendance/action for: Urgent: outage", "ASAP"),
                ActionItem::new("Review and respond to: Urgent: outage", "None"),
            ],
            draft_reply: String::new(),
        };
        important.is_read = true;

        let newsletter = EmailRecord {
            id: 2,
            sender: "news@vendor.com".into(),
            subject: "Digest".into(),
            timestamp: "2025-01-05T10:00:00".into(),
            body: "stories".into(),
            is_read: false,
            category: Some(Category::Newsletter),
            action_items: vec![ActionItem::new(
                "Process payment for: Digest",
                "Next week",
            )],
            draft_reply: String::new(),
        };

        InboxStore::from_parts(vec![important, newsletter], prompts()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn collect_tasks_preserves_order() {
        let store = store();
        let tasks = collect_tasks(&store);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].email.id, 1);
        assert_eq!(tasks[0].index, 0);
        assert_eq!(tasks[1].index, 1);
        assert_eq!(tasks[2].email.id, 2);
    }

    #[test]
    fn single_event_fields() {
        let store = store();
        let tasks = collect_tasks(&store);
        let ics = single_task_calendar(&tasks[0], now());

        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.contains("UID:task-1-0@inbox-assist"));
        assert!(ics.contains("DTSTAMP:20250106T120000Z"));
        assert!(ics.contains("SUMMARY:Confirm attendance/action for: Urgent: outage"));
        assert!(ics.contains("Deadline: ASAP"));
        // Important emails export at top priority.
        assert!(ics.contains("PRIORITY:1"));
        assert!(ics.trim_end().ends_with("END:VCALENDAR"));
    }

    #[test]
    fn non_important_gets_default_priority() {
        let store = store();
        let tasks = collect_tasks(&store);
        let ics = single_task_calendar(&tasks[2], now());
        assert!(ics.contains("PRIORITY:5"));
        assert!(ics.contains("UID:task-2-0@inbox-assist"));
    }

    #[test]
    fn summary_is_truncated() {
        let long_task = "x".repeat(200);
        let email = EmailRecord {
            id: 9,
            sender: "a@b.c".into(),
            subject: "s".into(),
            timestamp: "t".into(),
            body: "b".into(),
            is_read: false,
            category: None,
            action_items: vec![ActionItem::new(long_task, "None")],
            draft_reply: String::new(),
        };
        let entry = TaskEntry {
            email: &email,
            index: 0,
            item: &email.action_items[0],
        };
        let ics = single_task_calendar(&entry, now());
        let summary_line = ics
            .lines()
            .find(|l| l.starts_with("SUMMARY:"))
            .unwrap();
        assert_eq!(summary_line.len(), "SUMMARY:".len() + SUMMARY_MAX_CHARS);
        // Unprocessed email renders as such.
        assert!(ics.contains("Category: Unprocessed"));
    }

    #[test]
    fn bulk_calendar_has_one_event_per_task() {
        let store = store();
        let tasks = collect_tasks(&store);
        let ics = bulk_calendar(&tasks, now());
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 3);
        assert_eq!(ics.matches("BEGIN:VCALENDAR").count(), 1);
        assert_eq!(ics.matches("END:VCALENDAR").count(), 1);
    }
}
