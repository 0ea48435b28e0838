//! Enumerations for TUI state management.

/// Application state for the terminal user interface. The current [`crate::tui::router::View`]
/// decides what Browse shows; the other states are overlays on top of it.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    Browse,
    TaskDetail,
    DayDetail,
    AddTask,
    Help,
}

/// Input mode for text entry fields.
#[derive(Clone, Copy, PartialEq)]
pub enum InputMode {
    None,
    Text,
}

/// Tabs of the Tarefas view.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskTab {
    Pending,
    Adjustment,
    Completed,
}

impl TaskTab {
    pub const ALL: [TaskTab; 3] = [TaskTab::Pending, TaskTab::Adjustment, TaskTab::Completed];

    pub fn label(&self) -> &'static str {
        match self {
            TaskTab::Pending => "Pendentes",
            TaskTab::Adjustment => "Em Ajuste",
            TaskTab::Completed => "Concluídas",
        }
    }

    pub fn next(&self) -> TaskTab {
        match self {
            TaskTab::Pending => TaskTab::Adjustment,
            TaskTab::Adjustment => TaskTab::Completed,
            TaskTab::Completed => TaskTab::Pending,
        }
    }
}
