// File: ./src/model/command.rs
//! Structured commands produced by the intent router.
//!
//! A `ParsedCommand` is built fresh for every submission and handed to the caller,
//! which applies it to the task or event store. Nothing here is persisted.
use crate::model::item::{EventColor, Priority, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything needed to create a task except its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub due_time: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub course: String,
    pub tags: Vec<String>,
    pub completed: bool,
    pub starred: bool,
}

impl TaskFields {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date,
            due_time: None,
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            course: "General".to_string(),
            tags: Vec::new(),
            completed: false,
            starred: false,
        }
    }
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sets the status and keeps the `completed` flag consistent with it.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = Some(status);
        self.completed = Some(status.is_done());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFields {
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub color: EventColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ParsedCommand {
    CreateEvent(EventFields),
    CreateTask(TaskFields),
    UpdateTask { task_id: String, patch: TaskPatch },
    DeleteTask { task_id: String },
    ToggleComplete { task_id: String },
    ToggleStar { task_id: String },
    Unrecognized,
}
