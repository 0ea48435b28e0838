//! New-task form for the terminal user interface.
//!
//! Four text fields plus three cycling selectors. Validation happens at
//! submission: a record is only constructed once the required fields pass,
//! so no partial task ever reaches the store.

use chrono::NaiveDate;

use crate::db::parse_due_input;
use crate::fields::{Priority, TaskKind, TaskStatus};
use crate::task::NewTask;
use crate::tui::input::InputField;

/// Field order in the form popup.
pub const TITLE_FIELD: usize = 0;
pub const CLIENT_FIELD: usize = 1;
pub const DUE_FIELD: usize = 2;
pub const NOTES_FIELD: usize = 3;
pub const KIND_FIELD: usize = 4;
pub const STATUS_FIELD: usize = 5;
pub const PRIORITY_FIELD: usize = 6;

const FIELD_COUNT: usize = 7;

/// Form state for creating a task.
pub struct TaskForm {
    pub title: InputField,
    pub client: InputField,
    pub due: InputField,
    pub notes: InputField,
    pub kind: usize,
    pub status: usize,
    pub priority: usize,
    pub current_field: usize,
    pub kinds: Vec<TaskKind>,
    pub statuses: Vec<TaskStatus>,
    pub priorities: Vec<Priority>,
}

impl TaskForm {
    /// Fresh form with the due date prefilled from the calendar selection.
    pub fn new(default_due: NaiveDate) -> Self {
        let mut form = TaskForm {
            title: InputField::new(),
            client: InputField::new(),
            due: InputField::with_value(&default_due.format("%Y-%m-%d").to_string()),
            notes: InputField::new(),
            kind: 0,
            status: 1, // Producing
            priority: 0,
            current_field: 0,
            kinds: vec![
                TaskKind::Feed,
                TaskKind::Carousel,
                TaskKind::Stories,
                TaskKind::Adaptation,
            ],
            statuses: vec![
                TaskStatus::Awaiting,
                TaskStatus::Producing,
                TaskStatus::Done,
                TaskStatus::Late,
            ],
            priorities: vec![Priority::Normal, Priority::High, Priority::Critical],
        };
        form.update_active_field();
        form
    }

    pub fn field_count(&self) -> usize {
        FIELD_COUNT
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.field_count();
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            self.field_count() - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Update which text field is active for editing.
    pub fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.client.active = self.current_field == CLIENT_FIELD;
        self.due.active = self.current_field == DUE_FIELD;
        self.notes.active = self.current_field == NOTES_FIELD;
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            CLIENT_FIELD => Some(&mut self.client),
            DUE_FIELD => Some(&mut self.due),
            NOTES_FIELD => Some(&mut self.notes),
            _ => None,
        }
    }

    /// Handle character input for the active text field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    /// Handle backspace for the active text field.
    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    /// Handle delete-at-cursor for the active text field.
    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Arrow keys: cursor movement on text fields, cycling on selectors.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            KIND_FIELD => {
                self.kind = cycle(self.kind, self.kinds.len(), right);
            }
            STATUS_FIELD => {
                self.status = cycle(self.status, self.statuses.len(), right);
            }
            PRIORITY_FIELD => {
                self.priority = cycle(self.priority, self.priorities.len(), right);
            }
            _ => {
                if let Some(field) = self.active_input() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }

    /// Validate and build the task fields. Errors name the first failing
    /// requirement; nothing is constructed on failure.
    pub fn build(&self, today: NaiveDate) -> Result<NewTask, String> {
        let title = self.title.value.trim();
        if title.is_empty() {
            return Err("O título é obrigatório".to_string());
        }
        let client = self.client.value.trim();
        if client.is_empty() {
            return Err("O cliente é obrigatório".to_string());
        }
        let due = parse_due_input(&self.due.value, today)
            .ok_or_else(|| format!("Data inválida: '{}'", self.due.value.trim()))?;
        let notes = self.notes.value.trim();
        Ok(NewTask {
            title: title.to_string(),
            client: client.to_string(),
            due,
            kind: self.kinds[self.kind],
            status: self.statuses[self.status],
            priority: self.priorities[self.priority],
            notes: if notes.is_empty() {
                None
            } else {
                Some(notes.to_string())
            },
        })
    }
}

fn cycle(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 22).unwrap()
    }

    fn filled_form() -> TaskForm {
        let mut form = TaskForm::new(today());
        form.title = InputField::with_value("Feed promocional");
        form.client = InputField::with_value("Pedro Costa");
        form
    }

    #[test]
    fn test_build_requires_title_and_client() {
        let form = TaskForm::new(today());
        assert!(form.build(today()).is_err());
        let form = filled_form();
        let task = form.build(today()).unwrap();
        assert_eq!(task.title, "Feed promocional");
        assert_eq!(task.due, today());
        assert_eq!(task.status, TaskStatus::Producing);
    }

    #[test]
    fn test_build_rejects_malformed_due() {
        let mut form = filled_form();
        form.due = InputField::with_value("22/10/2025");
        let err = form.build(today()).unwrap_err();
        assert!(err.contains("Data inválida"));
    }

    #[test]
    fn test_selector_cycling_wraps() {
        let mut form = TaskForm::new(today());
        form.current_field = KIND_FIELD;
        form.handle_left_right(false);
        assert_eq!(form.kinds[form.kind], TaskKind::Adaptation);
        form.handle_left_right(true);
        assert_eq!(form.kinds[form.kind], TaskKind::Feed);
    }
}
