//! Rule-based reply drafter: the deterministic substitute for the LLM
//! auto-reply call.
//!
//! First match wins. Meeting/scheduling keywords are checked before the
//! newsletter/spam suppression tier, so an invitation inside a newsletter
//! still gets the agenda-request reply.

const MEETING_KEYWORDS: &[&str] = &[
    "meeting",
    "invitation",
    "schedule",
    "call",
    "sync",
    "brainstorm",
];

const TASK_SUBJECT_KEYWORDS: &[&str] = &["task request", "update", "review"];

const SUPPRESS_KEYWORDS: &[&str] = &["newsletter", "digest", "unsubscribe", "pre-approved"];

const MEETING_REPLY: &str = "Thank you for the invitation. Could you please send a brief \
     agenda or purpose for this meeting? I'd like to come prepared. Looking forward to it!";

const TASK_REPLY: &str = "Thank you for reaching out. I've received your request and will \
     look into this. I'll get back to you with an update soon.";

const QUESTION_REPLY: &str = "Thanks for your question. Let me review this and get back to \
     you with a detailed response shortly.";

const GENERIC_REPLY: &str =
    "Thank you for your email. I've received it and will respond accordingly.";

/// Draft a canned reply for an email. An empty string means "no reply
/// recommended" (newsletter/spam suppression).
pub fn draft(subject: &str, body: &str) -> String {
    let subject_lower = subject.to_lowercase();
    let body_lower = body.to_lowercase();

    // 1. Meeting/scheduling requests.
    if MEETING_KEYWORDS
        .iter()
        .any(|k| subject_lower.contains(k) || body_lower.contains(k))
    {
        return MEETING_REPLY.to_string();
    }

    // 2. Task/update/review requests, subject only.
    if TASK_SUBJECT_KEYWORDS.iter().any(|k| subject_lower.contains(k)) {
        return TASK_REPLY.to_string();
    }

    // 3. Questions.
    if subject_lower.contains("question") || body_lower.contains('?') {
        return QUESTION_REPLY.to_string();
    }

    // 4. Newsletter/spam: suppress the reply entirely.
    if SUPPRESS_KEYWORDS
        .iter()
        .any(|k| subject_lower.contains(k) || body_lower.contains(k))
    {
        return String::new();
    }

    // 5. Generic acknowledgment.
    GENERIC_REPLY.to_string()
}
