// File: src/model/matcher.rs
//! Resolves which existing task a free-text command refers to.
//!
//! Two passes, in order:
//!   1. Title containment: the first task (store order) whose title appears in
//!      the input, case-insensitively.
//!   2. Explicit reference: "id <token>" or "task <token>" where the token is
//!      exactly a known task id.
//!
//! No ranking is attempted. When both passes fail the caller gets `None` and
//! must not guess.

use crate::model::item::TaskRef;
use once_cell::sync::Lazy;
use regex::Regex;

static ID_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:id|task)\s*[:#]?\s*([\w\-]+)").expect("id reference pattern"));

pub fn resolve_task_id(text: &str, tasks: &[TaskRef]) -> Option<String> {
    match_by_title(text, tasks).or_else(|| match_by_id(text, tasks))
}

fn match_by_title(text: &str, tasks: &[TaskRef]) -> Option<String> {
    let haystack = text.to_lowercase();
    tasks
        .iter()
        .find(|t| {
            let title = t.title.trim().to_lowercase();
            !title.is_empty() && haystack.contains(&title)
        })
        .map(|t| t.id.clone())
}

fn match_by_id(text: &str, tasks: &[TaskRef]) -> Option<String> {
    ID_REF_RE.captures_iter(text).find_map(|caps| {
        let token = caps.get(1)?.as_str();
        tasks.iter().find(|t| t.id == token).map(|t| t.id.clone())
    })
}
