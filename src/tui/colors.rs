//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, TaskStatus};

// Palette lifted from the product's dark theme.

/// Brand accent, used for headers, the selected day and the focus gauge.
pub const GOLD: Color = Color::Rgb(255, 215, 90);
/// Paused timer and producing tasks.
pub const AMBER: Color = Color::Rgb(255, 192, 72);
/// Done tasks and approved deliveries.
pub const GREEN: Color = Color::Rgb(120, 224, 143);
/// Late tasks and urgent alerts.
pub const RED: Color = Color::Rgb(255, 107, 107);
/// Stopped timer and dimmed chrome.
pub const SLATE: Color = Color::Rgb(155, 165, 180);
/// Secondary text.
pub const GREY: Color = Color::Rgb(153, 153, 153);

/// Status dot color for a task.
pub fn task_status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Done => GREEN,
        TaskStatus::Producing => AMBER,
        TaskStatus::Awaiting => GOLD,
        TaskStatus::Late => RED,
    }
}

/// Accent color for a priority badge.
pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Critical => RED,
        Priority::High => AMBER,
        Priority::Normal => SLATE,
    }
}
