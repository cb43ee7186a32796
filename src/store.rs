// File: src/store.rs
//! In-memory task and event stores.
//!
//! The assistant core only ever talks to them through [`TaskActions`] and
//! [`EventActions`], so a UI can plug in its own store instead.
use crate::model::{
    CalendarEvent, EventFields, Task, TaskFields, TaskPatch, TaskRef, TaskStatus,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub trait TaskActions {
    fn add_task(&mut self, fields: TaskFields) -> Task;
    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Option<Task>;
    fn delete_task(&mut self, id: &str) -> Option<Task>;
    fn toggle_completed(&mut self, id: &str) -> Option<Task>;
    fn toggle_starred(&mut self, id: &str) -> Option<Task>;
    /// `(id, title)` pairs in store order, used to resolve references.
    fn snapshot(&self) -> Vec<TaskRef>;
}

pub trait EventActions {
    fn create_event(&mut self, fields: EventFields) -> CalendarEvent;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStore {
    pub tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl TaskActions for TaskStore {
    fn add_task(&mut self, fields: TaskFields) -> Task {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            due_time: fields.due_time,
            priority: fields.priority,
            status: fields.status,
            course: fields.course,
            tags: fields.tags,
            completed: fields.completed,
            starred: fields.starred,
        };
        self.tasks.push(task.clone());
        task
    }

    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Option<Task> {
        let task = self.get_mut(id)?;
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = Some(description.clone());
        }
        if let Some(date) = patch.due_date {
            task.due_date = date;
        }
        if let Some(time) = &patch.due_time {
            task.due_time = Some(time.clone());
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
            task.completed = status.is_done();
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
            if completed {
                task.status = TaskStatus::Completed;
            } else if task.status.is_done() {
                task.status = TaskStatus::Pending;
            }
        }
        if let Some(course) = &patch.course {
            task.course = course.clone();
        }
        Some(task.clone())
    }

    fn delete_task(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    fn toggle_completed(&mut self, id: &str) -> Option<Task> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        task.status = if task.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        };
        Some(task.clone())
    }

    fn toggle_starred(&mut self, id: &str) -> Option<Task> {
        let task = self.get_mut(id)?;
        task.starred = !task.starred;
        Some(task.clone())
    }

    fn snapshot(&self) -> Vec<TaskRef> {
        self.tasks.iter().map(TaskRef::from).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventStore {
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    next_id: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u64) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn allocate_id(&mut self) -> u64 {
        // Files written by hand may lack the counter; never reuse an existing id.
        let floor = self.events.iter().map(|e| e.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(floor) + 1;
        self.next_id
    }
}

impl EventActions for EventStore {
    fn create_event(&mut self, fields: EventFields) -> CalendarEvent {
        let event = CalendarEvent {
            id: self.allocate_id(),
            title: fields.title,
            date: fields.date,
            color: fields.color,
            time: fields.time,
            start_time: None,
            end_time: None,
        };
        self.events.push(event.clone());
        event
    }
}
