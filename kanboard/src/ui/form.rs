//! Create/edit task popup.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::theme;
use crate::app::{FormField, FormTarget, TaskForm};

const POPUP_WIDTH: u16 = 60;
const POPUP_HEIGHT: u16 = 11;

/// A rectangle of at most `width` x `height` centered in `area`.
#[must_use]
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Render the form over the board.
pub fn render(frame: &mut Frame, area: Rect, form: &TaskForm) {
    let popup = centered_rect(POPUP_WIDTH, POPUP_HEIGHT, area);
    let title = match form.target {
        FormTarget::Create => " New task ",
        FormTarget::Edit(_) => " Edit task ",
    };

    let mut lines: Vec<Line> = FormField::ALL
        .into_iter()
        .map(|field| field_line(form, field))
        .collect();
    lines.push(Line::default());
    match &form.error {
        Some(error) => lines.push(Line::from(Span::styled(
            error.as_str(),
            theme::normal().fg(theme::ERROR),
        ))),
        None => lines.push(Line::default()),
    }
    lines.push(Line::from(Span::styled(
        "Tab: next field | ←→: change | Enter: save | Esc: cancel",
        theme::dimmed(),
    )));

    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::HIGHLIGHT)))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn field_line(form: &TaskForm, field: FormField) -> Line<'_> {
    let focused = form.field == field;
    let (label, value) = match field {
        FormField::Title => ("Title", form.draft.title.clone()),
        FormField::Description => ("Description", form.draft.description.clone()),
        FormField::Priority => ("Priority", format!("< {} >", form.draft.priority)),
        FormField::Status => ("Status", format!("< {} >", form.draft.status.title())),
    };
    let marker = if focused { "> " } else { "  " };
    let cursor = if focused && matches!(field, FormField::Title | FormField::Description) {
        "_"
    } else {
        ""
    };
    Line::from(vec![
        Span::styled(marker, theme::highlighted()),
        Span::styled(format!("{label:<12}"), theme::dimmed()),
        Span::styled(
            format!("{value}{cursor}"),
            if focused {
                theme::bold()
            } else {
                theme::normal()
            },
        ),
    ])
}
