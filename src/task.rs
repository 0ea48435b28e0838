//! Task data structure.
//!
//! A task is a single piece of production work (a post, a carousel, a set of
//! stories) owed to a client by a calendar date. Status is an operator
//! decision, deliberately decoupled from the date-derived urgency bucket
//! computed in [`crate::deadline`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, TaskKind, TaskStatus};

/// A production work item with client, deadline and approval metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Free-text client name; matched against `Client.name` without any
    /// enforced referential integrity.
    pub client: String,
    /// Calendar date, no time-of-day component.
    pub due: NaiveDate,
    pub kind: TaskKind,
    pub status: TaskStatus,
    pub priority: Priority,
    pub notes: Option<String>,
}

/// Caller-supplied fields for task creation; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub client: String,
    pub due: NaiveDate,
    pub kind: TaskKind,
    pub status: TaskStatus,
    pub priority: Priority,
    pub notes: Option<String>,
}

/// Partial update applied to an existing task. `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub client: Option<String>,
    pub due: Option<NaiveDate>,
    pub kind: Option<TaskKind>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub notes: Option<Option<String>>,
}

impl Task {
    /// Apply a patch in place.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(client) = patch.client {
            self.client = client;
        }
        if let Some(due) = patch.due {
            self.due = due;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}
