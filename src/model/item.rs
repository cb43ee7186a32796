// File: ./src/model/item.rs
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumString;
use uuid::Uuid;

fn default_uid() -> String {
    Uuid::new_v4().to_string()
}

fn default_course() -> String {
    "General".to_string()
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Stored task status. Overdue and upcoming are never stored, see [`DisplayStatus`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in-progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Status as shown to the user, derived from the stored status and the wall clock.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DisplayStatus {
    Completed,
    Overdue,
    InProgress,
    Upcoming,
    Pending,
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DisplayStatus::Completed => "completed",
            DisplayStatus::Overdue => "overdue",
            DisplayStatus::InProgress => "in progress",
            DisplayStatus::Upcoming => "upcoming",
            DisplayStatus::Pending => "pending",
        };
        f.write_str(label)
    }
}

/// How far ahead a pending task counts as "upcoming".
pub const UPCOMING_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "default_uid")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub due_time: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default = "default_course")]
    pub course: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub starred: bool,
}

impl Task {
    /// The moment the task is due. Tasks without a time are due at the end of their day.
    pub fn due_moment(&self) -> NaiveDateTime {
        let time = self
            .due_time
            .as_deref()
            .and_then(parse_display_time)
            .unwrap_or_else(|| NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default());
        self.due_date.and_time(time)
    }

    /// Derives the status shown in lists. A completed task is never overdue.
    pub fn display_status(&self, now: NaiveDateTime) -> DisplayStatus {
        if self.completed || self.status.is_done() {
            return DisplayStatus::Completed;
        }
        if self.due_moment() < now {
            return DisplayStatus::Overdue;
        }
        if self.status == TaskStatus::InProgress {
            return DisplayStatus::InProgress;
        }
        let days_left = (self.due_date - now.date()).num_days();
        if days_left <= UPCOMING_WINDOW_DAYS {
            DisplayStatus::Upcoming
        } else {
            DisplayStatus::Pending
        }
    }
}

/// Minimal view of a task used to resolve references in free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    pub id: String,
    pub title: String,
}

impl TaskRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

impl From<&Task> for TaskRef {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventColor {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
    Pink,
    Orange,
    Yellow,
    Teal,
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventColor::Blue => "blue",
            EventColor::Green => "green",
            EventColor::Purple => "purple",
            EventColor::Red => "red",
            EventColor::Pink => "pink",
            EventColor::Orange => "orange",
            EventColor::Yellow => "yellow",
            EventColor::Teal => "teal",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: u64,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub color: EventColor,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl CalendarEvent {
    /// Minutes between start and end. Malformed or inverted ranges yield `None`.
    pub fn duration_minutes(&self) -> Option<i64> {
        let start = parse_display_time(self.start_time.as_deref()?)?;
        let end = parse_display_time(self.end_time.as_deref()?)?;
        let minutes = (end - start).num_minutes();
        (minutes > 0).then_some(minutes)
    }

    /// Short label such as "1h 30m". Empty when no duration can be computed.
    pub fn duration_label(&self) -> String {
        match self.duration_minutes() {
            Some(m) if m >= 60 && m % 60 == 0 => format!("{}h", m / 60),
            Some(m) if m >= 60 => format!("{}h {}m", m / 60, m % 60),
            Some(m) => format!("{}m", m),
            None => String::new(),
        }
    }
}

/// Parses "HH:MM AM/PM" as produced by the extractor (also accepts "H:MM" 24h).
pub fn parse_display_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(&s.to_uppercase(), "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}
