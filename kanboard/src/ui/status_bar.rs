//! Status bar rendering.

use kanboard_proto::TaskStatus;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Mode, NoticeLevel};

/// Key hints for the current input mode.
#[must_use]
pub fn help_text(app: &App) -> &'static str {
    if app.drag.is_pointer_gesture() {
        "Release: drop | Esc: cancel"
    } else if app.drag.is_dragging() {
        "←↑↓→: move | Space/Enter: drop | Esc: cancel"
    } else {
        match app.mode {
            Mode::Form(_) => "Tab: next field | Enter: save | Esc: cancel",
            Mode::Board => {
                "←↑↓→/hjkl: select | Space: grab | a: add | e: edit | d: delete | s/p: status/priority | J/K: reorder | q: quit"
            }
        }
    }
}

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled("Kanboard", theme::bold())];

    for status in TaskStatus::ALL {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{} {}", status.title(), app.store.by_status(status).count()),
            theme::normal().fg(theme::lane_color(status)),
        ));
    }

    if let Some(saved) = app.last_saved_label() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(format!("saved {saved}"), theme::dimmed()));
    }

    if let Some(notice) = &app.notice {
        let color = match notice.level {
            NoticeLevel::Info => theme::SUCCESS,
            NoticeLevel::Error => theme::ERROR,
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(notice.text.as_str(), theme::normal().fg(color)));
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled(help_text(app), theme::dimmed()));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
