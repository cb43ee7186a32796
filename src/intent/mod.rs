// File: ./src/intent/mod.rs
//! Natural-language command interpretation.
//!
//! `classifiers` holds one recognizer per action, `router` decides which of
//! them get a chance at an utterance and in what order.
pub mod classifiers;
pub mod router;

use crate::model::TaskRef;
use chrono::{Local, NaiveDate};

pub use router::{CLASSIFIERS, Classifier, IntentKind, Mode, Routed, parse_command, route};

/// Read-only inputs shared by all recognizers for one submission.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub today: NaiveDate,
    pub tasks: &'a [TaskRef],
    pub default_course: &'a str,
}

impl<'a> ParseContext<'a> {
    pub fn new(today: NaiveDate, tasks: &'a [TaskRef]) -> Self {
        Self {
            today,
            tasks,
            default_course: "General",
        }
    }

    /// Context anchored on the local wall-clock date.
    pub fn now(tasks: &'a [TaskRef]) -> Self {
        Self::new(Local::now().date_naive(), tasks)
    }

    pub fn with_default_course(mut self, course: &'a str) -> Self {
        self.default_course = course;
        self
    }
}
