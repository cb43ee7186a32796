// File: src/intent/classifiers.rs
//! Keyword-gated recognizers, one per action.
//!
//! Every recognizer is a pure function of the input text and a [`ParseContext`].
//! A recognizer returns `None` when its gate does not pass or, for the
//! task-targeting ones, when no existing task can be identified.
use crate::intent::ParseContext;
use crate::model::matcher::resolve_task_id;
use crate::model::parser::{extract_date_from, extract_iso_date, extract_time, find_day_keyword};
use crate::model::{EventColor, EventFields, Priority, TaskFields, TaskPatch, TaskStatus};
use once_cell::sync::Lazy;
use regex::Regex;

pub const CREATE_EVENT_GATE: &[&str] = &["create", "add", "schedule"];
pub const CREATE_TASK_GATE: &[&str] = &["create", "add", "make", "schedule"];
pub const UPDATE_TASK_GATE: &[&str] = &["update", "change", "modify", "edit"];
pub const DELETE_TASK_GATE: &[&str] = &[
    "delete",
    "remove",
    "cancel",
    "clear",
    "get rid of",
    "eliminate",
];
pub const TOGGLE_COMPLETE_GATE: &[&str] = &["complete", "finish", "done", "mark as done"];
pub const TOGGLE_STAR_GATE: &[&str] = &["star", "favorite", "favourite", "bookmark", "pin"];

const TASK_NOUNS: &[&str] = &["task", "assignment", "to-do", "todo"];
const EVENT_NOUNS: &[&str] = &[
    "event",
    "meeting",
    "appointment",
    "class",
    "deadline",
    "personal",
];

pub const DEFAULT_TASK_TITLE: &str = "New Task";
pub const DEFAULT_EVENT_TITLE: &str = "New Event";

// --- TEXT HELPERS ---

/// True when `keyword` occurs in `lower` at the start of a word.
pub fn has_keyword(lower: &str, keyword: &str) -> bool {
    lower.match_indices(keyword).any(|(idx, _)| {
        lower[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

/// True when `word` occurs in `lower` as a whole word.
pub fn has_word(lower: &str, word: &str) -> bool {
    lower.match_indices(word).any(|(idx, _)| {
        let before = lower[..idx].chars().next_back();
        let after = lower[idx + word.len()..].chars().next();
        before.is_none_or(|c| !c.is_alphanumeric()) && after.is_none_or(|c| !c.is_alphanumeric())
    })
}

/// True when any gate keyword occurs in `text` (case-insensitive, word start).
pub fn gate_passes(text: &str, gate: &[&str]) -> bool {
    let lower = text.to_lowercase();
    gate.iter().any(|k| has_keyword(&lower, k))
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern")
}

// Where a title stops: the first date, time, priority, course or description phrase.
static TITLE_STOP_RE: Lazy<Regex> = Lazy::new(|| {
    re(concat!(
        r"(?i)(?:\b(?:",
        r"(?:due\s+|on\s+|by\s+|for\s+|this\s+|next\s+)?(?:today|tomorrow|tonight|monday|tuesday|wednesday|thursday|friday|saturday|sunday)",
        r"|due\b",
        r"|(?:at|by)\s+\d",
        r"|\d{1,2}(?::\d{2})?\s*(?:am|pm)\b",
        r"|\d{4}-\d{2}-\d{2}",
        r"|(?:with\s+)?(?:an?\s+)?(?:high|medium|low)\s+priority",
        r"|priority\b",
        r"|(?:for|in)\s+(?:the\s+|my\s+)?(?:class|course)\b",
        r"|(?:for|in)\s+(?:the\s+|my\s+)?[\w\-]+\s+(?:class|course)\b",
        r"|description\s*:|details\s*:|about\b",
        r")|#\w)",
    ))
});

static LEADING_FILLER_RE: Lazy<Regex> = Lazy::new(|| {
    re(concat!(
        r"(?i)^(?:\s*(?:",
        r"(?:a|an|the|new|my|to|called|named|titled|task|event)\b",
        r"|[:\-]",
        r"|not\s+important\b|important\b|urgent\b",
        r"|(?:high|medium|low)(?:\s+priority)?\b",
        r"))+\s*",
    ))
});

static QUOTED_RE: Lazy<Regex> = Lazy::new(|| re(r#""([^"]+)"|“([^”]+)”"#));
static NAMED_RE: Lazy<Regex> = Lazy::new(|| re(r"(?i)\b(?:called|named|titled)\s+(.+)$"));
static AFTER_TASK_NOUN_RE: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\b(?:task|assignment|to-do|todo)\b\s*:?\s*(.+)$"));
static BEFORE_TASK_NOUN_RE: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:create|add|make|schedule)\s+(.+?)\s+(?:task|assignment|to-do|todo)\b")
});
static AFTER_CREATE_VERB_RE: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\b(?:create|add|make|schedule)\b\s*(.+)$"));

static EVENT_EXPLICIT_RE: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\b(?:called|named|titled|for)\s+(.+)$"));
static EVENT_BEFORE_TRAILER_RE: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:create|add|schedule)\s+(?:(?:an?|the|new)\s+)*(.+?)\s+(?:at|on|for)\b")
});
static EVENT_AFTER_NOUN_RE: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:event|meeting|appointment|class|deadline)\b\s*:?\s*(.+)$")
});

static COURSE_AFTER_RE: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:for|in)\s+(?:the\s+|my\s+)?(?:class|course)\s*:?\s+([\w\-]+(?:\s+[\w\-]+)*)")
});
static COURSE_BEFORE_RE: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:for|in)\s+(?:the\s+|my\s+)?([\w\-]+(?:\s+[\w\-]+)?)\s+(?:class|course)\b")
});
static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\b(?:description|details)\s*:\s*(.+)$"));
static ABOUT_RE: Lazy<Regex> = Lazy::new(|| re(r"(?i)\babout\s+(.+)$"));
// "for the biology class" names a course, not an event.
static COURSE_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:for|in)\s+(?:the\s+|my\s+)?(?:[\w\-]+\s+)?(?:class|course)\b")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| re(r"#([\w\-]+)"));

static RENAME_RE: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\b(?:rename|title|name)\b.*?\bto\s+(.+)$"));
static UPDATE_DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\b(?:description|details)\b\s*(?:to\b|:)\s*(.+)$"));
static PRIORITY_AFTER_RE: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\bpriority\s+(?:to\s+|is\s+|of\s+|as\s+)?(high|medium|low)\b"));
static PRIORITY_BEFORE_RE: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\b(high|medium|low)\s+priority\b"));
static STATUS_RE: Lazy<Regex> = Lazy::new(|| {
    re(r"(?i)\b(?:as|to)\s+(completed?|done|finished|pending|incomplete|not\s+started|in[\s\-]progress|started)\b")
});
static UPDATE_COURSE_RE: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\b(?:course|class)\b.*?\bto\s+([\w\-]+(?:\s+[\w\-]+)*)"));

// Words that end a course name ("for the class CS101 due friday").
const COURSE_STOP_WORDS: &[&str] = &[
    "due", "today", "tomorrow", "tonight", "at", "by", "on", "with", "priority", "high",
    "medium", "low", "urgent", "next", "this", "and", "description", "details", "about",
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn trim_punctuation(s: &str) -> &str {
    s.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '"' | '\'' | ',' | '.' | ':' | ';' | '-' | '!' | '?')
    })
}

/// Turns a raw title candidate into a display title, or `None` if nothing useful remains.
pub fn clean_title(raw: &str) -> Option<String> {
    let stripped = LEADING_FILLER_RE.replace(raw, "");
    let cut = match TITLE_STOP_RE.find(&stripped) {
        Some(m) => &stripped[..m.start()],
        None => &stripped[..],
    };
    let cleaned = LEADING_FILLER_RE.replace(cut, "");
    let title = trim_punctuation(&cleaned);
    if title.is_empty() {
        None
    } else {
        Some(capitalize(title))
    }
}

fn clean_course(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw
        .split_whitespace()
        .take_while(|w| !COURSE_STOP_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    let course = trim_punctuation(&words.join(" ")).to_string();
    (!course.is_empty()).then_some(course)
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.iter().skip(1).flatten().next().map(|m| m.as_str().to_string()))
}

/// Removes the first (ASCII case-insensitive) occurrence of `needle` so a task's
/// own title is not mistaken for field values.
fn without_title(text: &str, needle: &str) -> String {
    let hay = text.to_ascii_lowercase();
    let needle = needle.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return text.to_string();
    }
    match hay.find(&needle) {
        Some(idx) => format!("{} {}", &text[..idx], &text[idx + needle.len()..]),
        None => text.to_string(),
    }
}

// --- FIELD EXTRACTORS ---

/// Priority keywords: "not important" and "low" mean low; "high", "important"
/// and "urgent" mean high; anything else is medium.
pub fn detect_priority(text: &str) -> Priority {
    let lower = text.to_lowercase();
    if lower.contains("not important") {
        return Priority::Low;
    }
    if ["high", "important", "urgent"]
        .iter()
        .any(|k| has_word(&lower, k))
    {
        return Priority::High;
    }
    if has_word(&lower, "low") {
        return Priority::Low;
    }
    Priority::Medium
}

pub fn extract_course(text: &str) -> Option<String> {
    COURSE_AFTER_RE
        .captures(text)
        .and_then(|c| clean_course(&c[1]))
        .or_else(|| {
            COURSE_BEFORE_RE
                .captures(text)
                .and_then(|c| clean_course(&c[1]))
        })
}

pub fn extract_description(text: &str) -> Option<String> {
    first_capture(&DESCRIPTION_RE, text)
        .or_else(|| first_capture(&ABOUT_RE, text))
        .map(|d| trim_punctuation(&d).to_string())
        .filter(|d| !d.is_empty())
}

pub fn extract_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for caps in TAG_RE.captures_iter(text) {
        let tag = caps[1].to_string();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn task_title(text: &str) -> String {
    if let Some(t) = first_capture(&QUOTED_RE, text).and_then(|t| clean_title(&t)) {
        return t;
    }
    [
        &*NAMED_RE,
        &*AFTER_TASK_NOUN_RE,
        &*BEFORE_TASK_NOUN_RE,
        &*AFTER_CREATE_VERB_RE,
    ]
    .iter()
    .find_map(|re| first_capture(re, text).and_then(|raw| clean_title(&raw)))
    .unwrap_or_else(|| DEFAULT_TASK_TITLE.to_string())
}

fn event_title(text: &str) -> String {
    if let Some(t) = first_capture(&QUOTED_RE, text).and_then(|t| clean_title(&t)) {
        return t;
    }
    [
        &*EVENT_EXPLICIT_RE,
        &*EVENT_BEFORE_TRAILER_RE,
        &*EVENT_AFTER_NOUN_RE,
    ]
    .iter()
    .find_map(|re| first_capture(re, text).and_then(|raw| clean_title(&raw)))
    .unwrap_or_else(|| DEFAULT_EVENT_TITLE.to_string())
}

pub fn event_color(text: &str) -> EventColor {
    let lower = text.to_lowercase();
    [
        ("meeting", EventColor::Blue),
        ("class", EventColor::Green),
        ("appointment", EventColor::Purple),
        ("deadline", EventColor::Red),
        ("personal", EventColor::Pink),
    ]
    .iter()
    .find(|(k, _)| lower.contains(k))
    .map(|(_, c)| *c)
    .unwrap_or(EventColor::Blue)
}

// --- RECOGNIZERS ---

pub fn create_event(text: &str, ctx: &ParseContext<'_>) -> Option<EventFields> {
    if !gate_passes(text, CREATE_EVENT_GATE) {
        return None;
    }
    Some(EventFields {
        title: event_title(text),
        date: extract_iso_date(text).unwrap_or_else(|| extract_date_from(text, ctx.today)),
        time: extract_time(text),
        color: event_color(text),
    })
}

/// Task creation. Declines utterances that name an event ("meeting", "class",
/// "deadline") without naming a task, so they reach the event recognizer.
pub fn create_task(text: &str, ctx: &ParseContext<'_>) -> Option<TaskFields> {
    if !gate_passes(text, CREATE_TASK_GATE) {
        return None;
    }
    let lower = text.to_lowercase();
    let names_task = TASK_NOUNS.iter().any(|k| has_keyword(&lower, k));
    let outside_course = COURSE_PHRASE_RE.replace_all(&lower, " ");
    let names_event = EVENT_NOUNS
        .iter()
        .any(|k| has_keyword(&outside_course, k));
    if names_event && !names_task {
        return None;
    }

    let due_date = extract_iso_date(text).unwrap_or_else(|| extract_date_from(text, ctx.today));
    let mut fields = TaskFields::new(task_title(text), due_date);
    fields.description = extract_description(text);
    fields.due_time = extract_time(text);
    fields.priority = detect_priority(text);
    fields.course = extract_course(text).unwrap_or_else(|| ctx.default_course.to_string());
    fields.tags = extract_tags(text);
    fields.status = TaskStatus::Pending;
    fields.completed = false;
    fields.starred = false;
    Some(fields)
}

/// Field updates on an existing task. Fails as a whole when no target resolves.
pub fn update_task(text: &str, ctx: &ParseContext<'_>) -> Option<(String, TaskPatch)> {
    if !gate_passes(text, UPDATE_TASK_GATE) {
        return None;
    }
    let task_id = resolve_task_id(text, ctx.tasks)?;
    let title = ctx
        .tasks
        .iter()
        .find(|t| t.id == task_id)
        .map(|t| t.title.as_str())
        .unwrap_or_default();
    let rest = without_title(text, title);
    let lower = rest.to_lowercase();

    let mut patch = TaskPatch {
        title: first_capture(&RENAME_RE, &rest).and_then(|raw| clean_title(&raw)),
        description: first_capture(&UPDATE_DESCRIPTION_RE, &rest)
            .map(|d| trim_punctuation(&d).to_string())
            .filter(|d| !d.is_empty()),
        due_date: extract_iso_date(&rest).or_else(|| find_day_keyword(&rest, ctx.today)),
        due_time: extract_time(&rest),
        priority: first_capture(&PRIORITY_AFTER_RE, &rest)
            .or_else(|| first_capture(&PRIORITY_BEFORE_RE, &rest))
            .and_then(|p| p.parse::<Priority>().ok()),
        course: first_capture(&UPDATE_COURSE_RE, &rest).and_then(|c| clean_course(&c)),
        ..TaskPatch::default()
    };

    if (has_keyword(&lower, "mark") || has_keyword(&lower, "status"))
        && let Some(word) = first_capture(&STATUS_RE, &rest)
    {
        let word = word.to_lowercase();
        let status = if word.starts_with("complete") || word == "done" || word == "finished" {
            TaskStatus::Completed
        } else if (word.starts_with("in") && word.ends_with("progress")) || word == "started" {
            TaskStatus::InProgress
        } else {
            TaskStatus::Pending
        };
        patch.set_status(status);
    }

    Some((task_id, patch))
}

pub fn delete_task(text: &str, ctx: &ParseContext<'_>) -> Option<String> {
    targeted(text, ctx, DELETE_TASK_GATE)
}

pub fn toggle_complete(text: &str, ctx: &ParseContext<'_>) -> Option<String> {
    targeted(text, ctx, TOGGLE_COMPLETE_GATE)
}

pub fn toggle_star(text: &str, ctx: &ParseContext<'_>) -> Option<String> {
    targeted(text, ctx, TOGGLE_STAR_GATE)
}

fn targeted(text: &str, ctx: &ParseContext<'_>, gate: &[&str]) -> Option<String> {
    if !gate_passes(text, gate) {
        return None;
    }
    resolve_task_id(text, ctx.tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_matches_word_starts_only() {
        assert!(has_keyword("mark it completed", "complete"));
        assert!(!has_keyword("restart the server", "star"));
        assert!(has_keyword("get rid of it", "get rid of"));
        assert!(!has_keyword("pinecone", "cone"));
    }

    #[test]
    fn test_clean_title_cuts_at_dates_and_times() {
        assert_eq!(
            clean_title("math homework tomorrow at 6pm").as_deref(),
            Some("Math homework")
        );
        assert_eq!(clean_title("a new essay due friday").as_deref(), Some("Essay"));
        assert_eq!(clean_title("for tomorrow"), None);
        assert_eq!(clean_title("  "), None);
    }

    #[test]
    fn test_course_stops_before_trailing_words() {
        assert_eq!(
            extract_course("create task lab report for the course CHEM 201 due friday").as_deref(),
            Some("CHEM 201")
        );
        assert_eq!(
            extract_course("add task essay for the biology class").as_deref(),
            Some("biology")
        );
        assert_eq!(extract_course("create task laundry"), None);
    }

    #[test]
    fn test_not_important_is_low() {
        assert_eq!(detect_priority("create task, not important: tidy desk"), Priority::Low);
        assert_eq!(detect_priority("create important task"), Priority::High);
    }
}
