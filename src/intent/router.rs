// File: src/intent/router.rs
//! Command routing.
//!
//! The order of [`CLASSIFIERS`] is the tie-break policy: an utterance that
//! passes several gates ("create ... complete ...") goes to the earliest entry.
//! Event creation sits last and is tried exactly once.
use crate::intent::ParseContext;
use crate::intent::classifiers::{
    self, CREATE_EVENT_GATE, CREATE_TASK_GATE, DELETE_TASK_GATE, TOGGLE_COMPLETE_GATE,
    TOGGLE_STAR_GATE, UPDATE_TASK_GATE,
};
use crate::model::ParsedCommand;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    CreateTask,
    UpdateTask,
    DeleteTask,
    ToggleComplete,
    ToggleStar,
    CreateEvent,
}

/// One row of the routing table: a keyword gate and the extractor run when it passes.
pub struct Classifier {
    pub kind: IntentKind,
    pub gate: &'static [&'static str],
    extract: fn(&str, &ParseContext<'_>) -> Option<ParsedCommand>,
}

impl Classifier {
    pub fn gate_passes(&self, text: &str) -> bool {
        classifiers::gate_passes(text, self.gate)
    }

    pub fn classify(&self, text: &str, ctx: &ParseContext<'_>) -> Option<ParsedCommand> {
        if !self.gate_passes(text) {
            return None;
        }
        (self.extract)(text, ctx)
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("kind", &self.kind)
            .field("gate", &self.gate)
            .finish()
    }
}

fn extract_create_task(text: &str, ctx: &ParseContext<'_>) -> Option<ParsedCommand> {
    classifiers::create_task(text, ctx).map(ParsedCommand::CreateTask)
}

fn extract_update_task(text: &str, ctx: &ParseContext<'_>) -> Option<ParsedCommand> {
    classifiers::update_task(text, ctx)
        .map(|(task_id, patch)| ParsedCommand::UpdateTask { task_id, patch })
}

fn extract_delete_task(text: &str, ctx: &ParseContext<'_>) -> Option<ParsedCommand> {
    classifiers::delete_task(text, ctx).map(|task_id| ParsedCommand::DeleteTask { task_id })
}

fn extract_toggle_complete(text: &str, ctx: &ParseContext<'_>) -> Option<ParsedCommand> {
    classifiers::toggle_complete(text, ctx)
        .map(|task_id| ParsedCommand::ToggleComplete { task_id })
}

fn extract_toggle_star(text: &str, ctx: &ParseContext<'_>) -> Option<ParsedCommand> {
    classifiers::toggle_star(text, ctx).map(|task_id| ParsedCommand::ToggleStar { task_id })
}

fn extract_create_event(text: &str, ctx: &ParseContext<'_>) -> Option<ParsedCommand> {
    classifiers::create_event(text, ctx).map(ParsedCommand::CreateEvent)
}

pub static CLASSIFIERS: [Classifier; 6] = [
    Classifier {
        kind: IntentKind::CreateTask,
        gate: CREATE_TASK_GATE,
        extract: extract_create_task,
    },
    Classifier {
        kind: IntentKind::UpdateTask,
        gate: UPDATE_TASK_GATE,
        extract: extract_update_task,
    },
    Classifier {
        kind: IntentKind::DeleteTask,
        gate: DELETE_TASK_GATE,
        extract: extract_delete_task,
    },
    Classifier {
        kind: IntentKind::ToggleComplete,
        gate: TOGGLE_COMPLETE_GATE,
        extract: extract_toggle_complete,
    },
    Classifier {
        kind: IntentKind::ToggleStar,
        gate: TOGGLE_STAR_GATE,
        extract: extract_toggle_star,
    },
    Classifier {
        kind: IntentKind::CreateEvent,
        gate: CREATE_EVENT_GATE,
        extract: extract_create_event,
    },
];

/// Top-level mode of a submission. "agent" is accepted as a synonym of "create".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Ask,
}

impl Mode {
    /// Infers the mode from the wording when the caller did not pick one.
    pub fn infer(input: &str) -> Self {
        let lower = input.trim().to_lowercase();
        if lower.starts_with("create")
            || ["create task", "add task", "make task"]
                .iter()
                .any(|p| lower.contains(p))
        {
            Mode::Create
        } else {
            Mode::Ask
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" | "agent" => Ok(Mode::Create),
            "ask" => Ok(Mode::Ask),
            other => Err(format!("Unknown mode '{}'", other)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Create => write!(f, "create"),
            Mode::Ask => write!(f, "ask"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// A structured command for the caller to apply.
    Command(ParsedCommand),
    /// Free text to forward verbatim to the model as a user turn.
    Ask(String),
}

/// Runs the classifier table in order and returns the first match.
pub fn parse_command(input: &str, ctx: &ParseContext<'_>) -> ParsedCommand {
    let text = input.trim();
    for classifier in CLASSIFIERS.iter() {
        if let Some(cmd) = classifier.classify(text, ctx) {
            log::debug!("Routed input to {:?}", classifier.kind);
            return cmd;
        }
    }
    log::debug!("No classifier matched input");
    ParsedCommand::Unrecognized
}

/// Routes one submission. Never performs side effects.
pub fn route(input: &str, explicit_mode: Option<Mode>, ctx: &ParseContext<'_>) -> Routed {
    let mode = explicit_mode.unwrap_or_else(|| Mode::infer(input));
    match mode {
        Mode::Create => Routed::Command(parse_command(input, ctx)),
        Mode::Ask => Routed::Ask(input.to_string()),
    }
}
