//! Theme and styling constants for the TUI.

use kanboard_proto::{Priority, TaskStatus};
use ratatui::style::{Color, Modifier, Style};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Border and title color of the candidate drop target.
pub const DROP_TARGET: Color = Color::Rgb(168, 85, 247);

/// Success indicator color.
pub const SUCCESS: Color = Color::Green;

/// Warning indicator color.
pub const WARNING: Color = Color::Yellow;

/// Error indicator color.
pub const ERROR: Color = Color::Red;

/// Badge color for a priority.
#[must_use]
pub const fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => ERROR,
        Priority::Medium => WARNING,
        Priority::Low => SUCCESS,
    }
}

/// Title color for a lane.
#[must_use]
pub const fn lane_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::LightBlue,
        TaskStatus::InProgress => Color::LightYellow,
        TaskStatus::Done => Color::LightGreen,
    }
}

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (descriptions, metadata).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused lane borders).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected card border.
#[must_use]
pub fn selected() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// The grasped card stays in place but fades while dragging.
#[must_use]
pub fn grasped() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM | Modifier::ITALIC)
}

/// Border of the lane or card under the drop candidate.
#[must_use]
pub fn drop_target() -> Style {
    Style::default()
        .fg(DROP_TARGET)
        .add_modifier(Modifier::BOLD)
}

/// The floating copy of the grasped card drawn at the pointer.
#[must_use]
pub fn ghost() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(60, 40, 90))
}

/// Style for the status bar background (dark background with white foreground).
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style for priority badges (bold black on the priority color).
#[must_use]
pub fn priority_badge(priority: Priority) -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(priority_color(priority))
        .add_modifier(Modifier::BOLD)
}
