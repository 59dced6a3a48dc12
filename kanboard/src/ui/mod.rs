//! Terminal UI rendering.

pub mod board;
pub mod form;
pub mod layout;
pub mod status_bar;
pub mod theme;

use ratatui::Frame;

use crate::app::{App, Mode};

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (board_area, status_area) = layout::split_screen(area);

    board::render(frame, board_area, app);
    status_bar::render(frame, status_area, app);

    if let Mode::Form(form) = &app.mode {
        form::render(frame, area, form);
    }
}
