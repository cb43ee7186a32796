// File: src/controller.rs
//! Applies parsed commands to the task and event stores.
//! UI layers hand every `ParsedCommand` to [`apply_command`] so the confirmation
//! text shown in the transcript is the same everywhere.
use crate::model::{ParsedCommand, Task};
use crate::model::parser::to_iso;
use crate::store::{EventActions, TaskActions};

/// Outcome of applying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Whether any store changed.
    pub changed: bool,
    /// One-line confirmation for the chat transcript.
    pub message: String,
}

impl Applied {
    fn changed(message: String) -> Self {
        Self {
            changed: true,
            message,
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            message: message.into(),
        }
    }
}

pub const UNRECOGNIZED_MESSAGE: &str = "Sorry, I couldn't work out what to do with that. \
Try something like \"create task essay due friday at 5pm\" or \"star essay\".";

fn due_label(task: &Task) -> String {
    match &task.due_time {
        Some(t) => format!("{} at {}", to_iso(task.due_date), t),
        None => to_iso(task.due_date),
    }
}

pub fn apply_command(
    command: ParsedCommand,
    tasks: &mut dyn TaskActions,
    events: &mut dyn EventActions,
) -> Applied {
    let missing = |id: &str| {
        log::warn!("Command targets unknown task {}", id);
        Applied::unchanged("That task no longer exists.")
    };

    match command {
        ParsedCommand::CreateTask(fields) => {
            let task = tasks.add_task(fields);
            log::info!("Created task {}", task.id);
            Applied::changed(format!(
                "Created task \"{}\" due {} ({} priority, {}).",
                task.title,
                due_label(&task),
                task.priority,
                task.course
            ))
        }
        ParsedCommand::UpdateTask { task_id, patch } => {
            if patch.is_empty() {
                return Applied::unchanged("I found the task but didn't see anything to change.");
            }
            match tasks.update_task(&task_id, &patch) {
                Some(task) => Applied::changed(format!("Updated task \"{}\".", task.title)),
                None => missing(&task_id),
            }
        }
        ParsedCommand::DeleteTask { task_id } => match tasks.delete_task(&task_id) {
            Some(task) => Applied::changed(format!("Deleted task \"{}\".", task.title)),
            None => missing(&task_id),
        },
        ParsedCommand::ToggleComplete { task_id } => match tasks.toggle_completed(&task_id) {
            Some(task) if task.completed => {
                Applied::changed(format!("Marked \"{}\" as completed.", task.title))
            }
            Some(task) => Applied::changed(format!("Marked \"{}\" as not completed.", task.title)),
            None => missing(&task_id),
        },
        ParsedCommand::ToggleStar { task_id } => match tasks.toggle_starred(&task_id) {
            Some(task) if task.starred => Applied::changed(format!("Starred \"{}\".", task.title)),
            Some(task) => Applied::changed(format!("Unstarred \"{}\".", task.title)),
            None => missing(&task_id),
        },
        ParsedCommand::CreateEvent(fields) => {
            let event = events.create_event(fields);
            log::info!("Created event {}", event.id);
            let when = match &event.time {
                Some(t) => format!("{} at {}", to_iso(event.date), t),
                None => to_iso(event.date),
            };
            Applied::changed(format!("Added \"{}\" to your calendar on {}.", event.title, when))
        }
        ParsedCommand::Unrecognized => Applied::unchanged(UNRECOGNIZED_MESSAGE),
    }
}
