// File: ./src/model/mod.rs
pub mod command;
pub mod item;
pub mod matcher;
pub mod parser;

pub use command::{EventFields, ParsedCommand, TaskFields, TaskPatch};
pub use item::{
    CalendarEvent, DisplayStatus, EventColor, Priority, Task, TaskRef, TaskStatus,
    parse_display_time,
};
