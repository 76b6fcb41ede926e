//! Rule-based email classifier: the deterministic substitute for the LLM
//! categorization call.
//!
//! An ordered priority cascade over case-insensitive substring matches:
//! spam → strong newsletter signals → important → to-do (three body phrase
//! families) → to-do (subject keywords) → conditional single-word to-do →
//! general newsletter signals → policy/status announcements → Newsletter.
//!
//! First match wins. The tier order is load-bearing: a spam phrase beats a
//! director sender, and "urgent" in the subject beats any to-do trigger.

use crate::store::Category;

// ── Tier 1: spam indicators (subject or body) ───────────────────────

const SPAM_INDICATORS: &[&str] = &[
    "pre-approved",
    "loan",
    "click here immediately",
    "act fast",
    "social security number",
    "unauthorized login",
    "suspicious",
    "verify your credentials",
    "verify your account",
    "claim your",
    "limited time",
    "act now",
    "you have won",
];

// ── Tier 4: to-do phrase families (body) ────────────────────────────

const DIRECT_ACTION_PHRASES: &[&str] = &[
    "please confirm",
    "please send",
    "please update",
    "please review",
    "need you to",
    "can you",
    "could you",
    "would you",
    "must complete",
    "required to",
    "action required",
    "respond by",
    "reply by",
    "confirm by",
    "task request",
    "confirm your",
    "send your",
    "update your",
];

const MEETING_REQUEST_PHRASES: &[&str] = &[
    "jump on a call",
    "schedule a call",
    "quick call",
    "can we meet",
    "meeting request",
    "let me know if",
    "what time works",
    "does this time work",
    "are you available",
    "schedule a meeting",
    "suggest a time",
    "suggest an alternative",
];

const QUESTION_REQUEST_PHRASES: &[&str] = &[
    "could we",
    "can we",
    "would you be able to",
    "are you able to",
    "do you have time",
    "when can you",
    "how soon can you",
];

// ── Tier 5: to-do subject keywords ──────────────────────────────────

const TODO_SUBJECT_KEYWORDS: &[&str] = &["need help", "follow-up", "question about", "help with"];

// ── Tier 6: single action words + urgency markers ───────────────────

const SINGLE_ACTION_WORDS: &[&str] = &["confirm", "update", "review", "complete"];

const URGENCY_MARKERS: &[&str] = &[
    "please",
    "by eod",
    "deadline",
    "asap",
    "urgent",
    "by today",
    "by tomorrow",
];

// ── Tier 7: general newsletter signals ──────────────────────────────

const NEWSLETTER_INDICATORS: &[&str] = &[
    "digest",
    "newsletter",
    "weekly update",
    "monthly update",
    "last month",
    "unsubscribe",
    "view in browser",
    "new release",
    "announcement",
    "latest news",
    "this week",
    "tech digest",
    "updates include",
    "we've been up to",
    "excited to share",
    "here's what",
    "what we've been",
    "this month's updates",
    "happy to announce",
    "check out",
    "new and improved",
    "and much more",
    "and more",
    "introducing",
    "now available",
    "this quarter",
    "our team",
    "we are thrilled",
];

const NEWSLETTER_SENDER_MARKERS: &[&str] = &[
    "marketing",
    "news@",
    "newsletter@",
    "noreply@",
    "updates@",
    "hello@",
    "team@",
    "info@",
];

// ── Tier 8: policy/status announcements ─────────────────────────────

const ANNOUNCEMENT_PHRASES: &[&str] = &[
    "policy change",
    "status update",
    "no action",
    "company-wide",
    "fyi",
    "for your information",
];

fn contains_any(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| haystack.contains(p))
}

fn any_in_either(a: &str, b: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| a.contains(p) || b.contains(p))
}

/// Classify an email into exactly one category.
///
/// Total over its inputs: every email gets a category, defaulting to
/// `Newsletter` for plain informational content.
pub fn classify(subject: &str, body: &str, sender: &str) -> Category {
    let subject = subject.to_lowercase();
    let body = body.to_lowercase();
    let sender = sender.to_lowercase();

    // 1. Spam, highest priority.
    if any_in_either(&subject, &body, SPAM_INDICATORS) {
        return Category::Spam;
    }

    // 2. Strong newsletter signals, checked before to-do/important.
    if body.contains("informational")
        || body.contains("unsubscribe")
        || body.contains("view in browser")
        || body.contains("we've been")
        || body.contains("excited to share")
        || (body.contains("last month") && body.contains("updates"))
    {
        return Category::Newsletter;
    }

    // 3. Important: urgent subjects and leadership senders.
    if subject.contains("urgent") || sender.contains("director") || sender.contains("ceo") {
        return Category::Important;
    }

    // 4. To-do via the three body phrase families.
    if contains_any(&body, DIRECT_ACTION_PHRASES)
        || contains_any(&body, MEETING_REQUEST_PHRASES)
        || contains_any(&body, QUESTION_REQUEST_PHRASES)
    {
        return Category::ToDo;
    }

    // 5. To-do via subject keywords.
    if contains_any(&subject, TODO_SUBJECT_KEYWORDS) {
        return Category::ToDo;
    }

    // 6. Single action words only count with an urgency marker in the body.
    if any_in_either(&subject, &body, SINGLE_ACTION_WORDS)
        && contains_any(&body, URGENCY_MARKERS)
    {
        return Category::ToDo;
    }

    // 7. General newsletter content or sender patterns.
    if any_in_either(&subject, &body, NEWSLETTER_INDICATORS)
        || contains_any(&sender, NEWSLETTER_SENDER_MARKERS)
    {
        return Category::Newsletter;
    }

    // 8. Policy/status announcements read as newsletter-grade.
    if any_in_either(&subject, &body, ANNOUNCEMENT_PHRASES) {
        return Category::Newsletter;
    }

    // 9. Default.
    Category::Newsletter
}
