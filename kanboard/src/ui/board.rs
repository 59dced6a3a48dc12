//! Board rendering: three lanes of cards plus the dragged ghost.

use kanboard_proto::{DropTarget, Task};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::layout::{BoardLayout, CardSlot, LaneSlot};
use super::theme;
use crate::app::App;

/// Height of the floating card drawn at the pointer.
const GHOST_HEIGHT: u16 = 3;

/// Render the lanes and their cards into `area`.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let layout = BoardLayout::compute(area, app.store.tasks());

    for lane in &layout.lanes {
        render_lane(frame, lane, app);
    }
    for slot in &layout.cards {
        if let Some(task) = app.store.get(&slot.task_id) {
            render_card(frame, slot, task, app);
        }
    }
    render_ghost(frame, area, &layout, app);
}

fn render_lane(frame: &mut Frame, lane: &LaneSlot, app: &App) {
    let count = app.store.by_status(lane.status).count();
    let is_target = app.drag.over() == Some(&DropTarget::Lane(lane.status));
    let is_focused = app.drag.is_idle() && app.focus_lane == lane.status;

    let border_style = if is_target {
        theme::drop_target()
    } else if is_focused {
        theme::highlighted()
    } else {
        theme::normal()
    };

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", lane.status.title()),
            theme::panel_title(theme::lane_color(lane.status)),
        ),
        Span::styled(format!("({count}) "), theme::dimmed()),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    frame.render_widget(block, lane.area);

    if count == 0 {
        let hint = if is_target {
            "Release to drop here"
        } else {
            "No tasks"
        };
        let placeholder = Paragraph::new(Line::from(Span::styled(hint, theme::dimmed())));
        frame.render_widget(placeholder, lane.inner);
    } else if lane.hidden > 0 && lane.inner.height > 0 {
        let more = Rect {
            y: lane.inner.bottom().saturating_sub(1),
            height: 1,
            ..lane.inner
        };
        let text = Paragraph::new(Span::styled(
            format!("+{} more", lane.hidden),
            theme::dimmed(),
        ));
        frame.render_widget(text, more);
    }
}

fn render_card(frame: &mut Frame, slot: &CardSlot, task: &Task, app: &App) {
    let is_active = app.drag.active() == Some(&task.id);
    let is_target = !is_active && app.drag.over() == Some(&DropTarget::Task(task.id.clone()));
    let is_selected = app.drag.is_idle() && app.selected.as_ref() == Some(&task.id);

    let (border_style, text_style) = if is_active {
        (theme::grasped(), theme::grasped())
    } else if is_target {
        (theme::drop_target(), theme::normal())
    } else if is_selected {
        (theme::selected(), theme::bold())
    } else {
        (theme::dimmed(), theme::normal())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let paragraph = Paragraph::new(card_lines(task, text_style)).block(block);
    frame.render_widget(paragraph, slot.area);
}

/// Title line with a priority badge, then the first description line.
fn card_lines(task: &Task, style: Style) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {} ", task.priority.as_str().to_uppercase()),
            theme::priority_badge(task.priority),
        ),
        Span::raw(" "),
        Span::styled(task.title.as_str(), style),
    ])];
    if let Some(first) = task.description.lines().next() {
        lines.push(Line::from(Span::styled(first, theme::dimmed())));
    }
    lines
}

/// Draws the grasped card at the pointer during a mouse drag.
fn render_ghost(frame: &mut Frame, area: Rect, layout: &BoardLayout, app: &App) {
    let (Some(pointer), Some(id)) = (app.drag.pointer(), app.drag.active()) else {
        return;
    };
    let Some(task) = app.store.get(id) else {
        return;
    };
    let width = layout
        .card(id)
        .map_or(area.width / 3, |slot| slot.area.width);
    let ghost = Rect::new(pointer.x, pointer.y, width, GHOST_HEIGHT).intersection(area);
    if ghost.is_empty() {
        return;
    }

    let target = match app.drag.over() {
        Some(DropTarget::Lane(status)) => status.title(),
        Some(DropTarget::Task(over)) => app
            .store
            .get(over)
            .map_or("nowhere", |t| t.status.title()),
        None => "nowhere",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::drop_target())
        .title(Span::styled(format!(" to {target} "), theme::dimmed()));
    let paragraph = Paragraph::new(Span::styled(task.title.as_str(), theme::ghost()))
        .style(theme::ghost())
        .block(block);

    frame.render_widget(Clear, ghost);
    frame.render_widget(paragraph, ghost);
}
