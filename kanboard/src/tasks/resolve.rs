//! Pure drop resolution for finished drag gestures.
//!
//! [`plan_drop`] turns `(active task, drop target, collection)` into a
//! [`DropOutcome`]; [`DropOutcome::apply`] produces the next collection.
//! Neither step can fail: stale or malformed input plans a no-op, because
//! a UI event may refer to a task that has since been deleted.
//!
//! Rules:
//! 1. No target: no-op.
//! 2. Lane target: the task takes the lane's status and moves to the end of
//!    the collection, which makes it last in that lane. Dropping on the lane
//!    the task is already in is a no-op.
//! 3. Card target: array-move the active task to the target's index. If the
//!    target sits in another lane, the active task also takes its status.
//! 4. Dropping a card onto itself: no-op.

use kanboard_proto::{DropTarget, Task, TaskId, TaskStatus};

/// What a finished gesture does to the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing changes.
    Unchanged,
    /// The task at `index` takes `status` and moves to the end.
    Recategorize {
        /// Current index of the dropped task.
        index: usize,
        /// Status of the lane it was dropped on.
        status: TaskStatus,
    },
    /// The task at `from` moves to `to`; `status` is set when the target
    /// card belongs to another lane.
    Move {
        /// Current index of the dropped task.
        from: usize,
        /// Index of the card it was dropped onto.
        to: usize,
        /// Status adopted from the target card, if it differs.
        status: Option<TaskStatus>,
    },
}

impl DropOutcome {
    /// Returns `true` if applying this outcome changes nothing.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Builds the next collection. The input is never modified.
    #[must_use]
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        match *self {
            Self::Unchanged => tasks.to_vec(),
            Self::Recategorize { index, status } => {
                let mut next = tasks.to_vec();
                if index < next.len() {
                    let mut task = next.remove(index);
                    task.status = status;
                    next.push(task);
                }
                next
            }
            Self::Move { from, to, status } => {
                let mut next = array_move(tasks, from, to);
                if let Some(status) = status
                    && let Some(task) = next.get_mut(to)
                {
                    task.status = status;
                }
                next
            }
        }
    }
}

/// Moves the element at `from` to `to`, shifting the elements in between by
/// one slot. Out-of-range indices return an unchanged copy.
#[must_use]
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut next = items.to_vec();
    if from == to || from >= next.len() || to >= next.len() {
        return next;
    }
    let item = next.remove(from);
    next.insert(to, item);
    next
}

/// Decides what dropping `active` over `target` does.
#[must_use]
pub fn plan_drop(active: &TaskId, target: Option<&DropTarget>, tasks: &[Task]) -> DropOutcome {
    let Some(target) = target else {
        return DropOutcome::Unchanged;
    };
    let Some(from) = tasks.iter().position(|t| &t.id == active) else {
        return DropOutcome::Unchanged;
    };

    match target {
        DropTarget::Lane(status) => {
            if tasks[from].status == *status {
                DropOutcome::Unchanged
            } else {
                DropOutcome::Recategorize {
                    index: from,
                    status: *status,
                }
            }
        }
        DropTarget::Task(over) => {
            if over == active {
                return DropOutcome::Unchanged;
            }
            let Some(to) = tasks.iter().position(|t| &t.id == over) else {
                return DropOutcome::Unchanged;
            };
            let target_status = tasks[to].status;
            DropOutcome::Move {
                from,
                to,
                status: (tasks[from].status != target_status).then_some(target_status),
            }
        }
    }
}

/// Plans and applies a drop in one step.
#[must_use]
pub fn resolve_drop(active: &TaskId, target: Option<&DropTarget>, tasks: &[Task]) -> Vec<Task> {
    plan_drop(active, target, tasks).apply(tasks)
}
