//! Keyboard movement of the drop candidate.
//!
//! Up/Down step through the cards of the candidate's lane in collection
//! order. Stepping down past the last card targets the lane itself, and
//! stepping up from the lane target returns to the last card. Left/Right
//! jump to the neighbouring lane. Movement clamps at the board edges.

use kanboard_proto::{DropTarget, Task, TaskId, TaskStatus};

/// A keyboard movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    /// Previous card in the lane.
    Up,
    /// Next card in the lane, then the lane itself.
    Down,
    /// Lane to the left.
    Left,
    /// Lane to the right.
    Right,
}

/// Computes the next drop candidate for a keyboard-driven gesture.
///
/// Returns `None` only when the active task is not on the board.
#[must_use]
pub fn next_candidate(
    active: &TaskId,
    over: Option<&DropTarget>,
    direction: KeyDirection,
    tasks: &[Task],
) -> Option<DropTarget> {
    let active_status = tasks.iter().find(|t| &t.id == active)?.status;
    let lane = candidate_lane(over, tasks).unwrap_or(active_status);
    let siblings: Vec<&TaskId> = tasks
        .iter()
        .filter(|t| t.status == lane)
        .map(|t| &t.id)
        .collect();
    let position = over
        .and_then(DropTarget::task_id)
        .and_then(|id| siblings.iter().position(|s| *s == id));

    let next = match direction {
        KeyDirection::Left => DropTarget::Lane(lane.previous().unwrap_or(lane)),
        KeyDirection::Right => DropTarget::Lane(lane.next().unwrap_or(lane)),
        KeyDirection::Up => match position {
            Some(idx) => DropTarget::Task(siblings[idx.saturating_sub(1)].clone()),
            None => siblings
                .last()
                .map_or(DropTarget::Lane(lane), |id| DropTarget::Task((*id).clone())),
        },
        KeyDirection::Down => match position {
            Some(idx) if idx + 1 < siblings.len() => DropTarget::Task(siblings[idx + 1].clone()),
            _ => DropTarget::Lane(lane),
        },
    };
    Some(next)
}

/// The lane a candidate points into, if it resolves to one.
fn candidate_lane(over: Option<&DropTarget>, tasks: &[Task]) -> Option<TaskStatus> {
    match over? {
        DropTarget::Lane(status) => Some(*status),
        DropTarget::Task(id) => tasks.iter().find(|t| &t.id == id).map(|t| t.status),
    }
}
