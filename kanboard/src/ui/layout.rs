//! Board geometry shared by rendering and pointer hit testing.
//!
//! [`BoardLayout::compute`] is a pure function of the screen area and the
//! task collection. The renderer draws exactly these rectangles and the
//! pointer sensor hit-tests against them, so a card is droppable where it
//! is drawn.

use kanboard_proto::{DropTarget, Task, TaskId, TaskStatus};
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

/// Rows taken by one card, borders included.
pub const CARD_HEIGHT: u16 = 4;

/// Splits the screen into the board area and the one-line status bar.
#[must_use]
pub fn split_screen(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// A lane column and the region inside its border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneSlot {
    /// Lane status.
    pub status: TaskStatus,
    /// Outer rectangle, border included.
    pub area: Rect,
    /// Region available for cards.
    pub inner: Rect,
    /// Cards in this lane that did not fit.
    pub hidden: usize,
}

/// A card position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSlot {
    /// The task drawn here.
    pub task_id: TaskId,
    /// Card rectangle, border included.
    pub area: Rect,
}

/// Where every lane and visible card sits on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    /// Lanes in column order.
    pub lanes: Vec<LaneSlot>,
    /// Visible cards, lane by lane in collection order.
    pub cards: Vec<CardSlot>,
}

impl BoardLayout {
    /// Lays out three equal lanes in `area` and stacks each lane's cards.
    #[must_use]
    pub fn compute(area: Rect, tasks: &[Task]) -> Self {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let mut layout = Self::default();
        for (status, column) in TaskStatus::ALL.into_iter().zip(columns.iter().copied()) {
            let inner = Rect {
                x: column.x.saturating_add(1),
                y: column.y.saturating_add(1),
                width: column.width.saturating_sub(2),
                height: column.height.saturating_sub(2),
            };
            let capacity = usize::from(inner.height / CARD_HEIGHT);
            let mut shown = 0usize;
            let mut hidden = 0usize;
            for task in tasks.iter().filter(|t| t.status == status) {
                if shown < capacity {
                    let offset = u16::try_from(shown).unwrap_or(u16::MAX) * CARD_HEIGHT;
                    layout.cards.push(CardSlot {
                        task_id: task.id.clone(),
                        area: Rect {
                            x: inner.x,
                            y: inner.y.saturating_add(offset),
                            width: inner.width,
                            height: CARD_HEIGHT,
                        },
                    });
                    shown += 1;
                } else {
                    hidden += 1;
                }
            }
            layout.lanes.push(LaneSlot {
                status,
                area: column,
                inner,
                hidden,
            });
        }
        layout
    }

    /// The card under a screen position.
    #[must_use]
    pub fn card_at(&self, x: u16, y: u16) -> Option<&TaskId> {
        let position = Position::new(x, y);
        self.cards
            .iter()
            .find(|slot| slot.area.contains(position))
            .map(|slot| &slot.task_id)
    }

    /// The lane under a screen position.
    #[must_use]
    pub fn lane_at(&self, x: u16, y: u16) -> Option<TaskStatus> {
        let position = Position::new(x, y);
        self.lanes
            .iter()
            .find(|slot| slot.area.contains(position))
            .map(|slot| slot.status)
    }

    /// The drop target under a screen position: a card wins over its lane.
    #[must_use]
    pub fn hit_test(&self, x: u16, y: u16) -> Option<DropTarget> {
        if let Some(id) = self.card_at(x, y) {
            return Some(DropTarget::Task(id.clone()));
        }
        self.lane_at(x, y).map(DropTarget::Lane)
    }

    /// The slot of a lane.
    #[must_use]
    pub fn lane(&self, status: TaskStatus) -> Option<&LaneSlot> {
        self.lanes.iter().find(|slot| slot.status == status)
    }

    /// The slot of a card, if it is visible.
    #[must_use]
    pub fn card(&self, id: &TaskId) -> Option<&CardSlot> {
        self.cards.iter().find(|slot| &slot.task_id == id)
    }
}
