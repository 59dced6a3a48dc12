//! The drag session state machine.
//!
//! ```text
//!            pointer_down            moved >= activation distance
//!   Idle ───────────────────> Pending ───────────────────────────> Dragging
//!    ^  <─── pointer_up (click) ─┘                                   │
//!    │  <─────── pointer_up / release (commit) ──────────────────────┤
//!    │  <──────────────────── cancel ────────────────────────────────┘
//!    └── pick_up (keyboard) goes straight to Dragging
//! ```
//!
//! Candidate updates never touch the task store. Only the single
//! [`DragEnd::Commit`] returned on release carries a decision, and a
//! cancelled gesture returns nothing to apply.

use kanboard_proto::{DropTarget, Task, TaskId};

use super::keyboard::{KeyDirection, next_candidate};

/// Default pointer travel before a press becomes a drag.
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 5.0;

/// A pointer position in logical units (terminal cells in the TUI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: u16,
    /// Vertical position.
    pub y: u16,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

/// Where the session is in a gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer pressed on a card but not yet moved far enough.
    Pending {
        /// The pressed card.
        task_id: TaskId,
        /// Where the press happened.
        origin: Point,
    },
    /// A card is grasped.
    Dragging {
        /// The grasped card.
        task_id: TaskId,
        /// The current drop candidate.
        over: Option<DropTarget>,
        /// Last known pointer position (`None` for keyboard gestures).
        pointer: Option<Point>,
    },
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEnd {
    /// Released while dragging: apply this drop to the store.
    Commit {
        /// The grasped task.
        active: TaskId,
        /// The drop target under the release, if any.
        target: Option<DropTarget>,
    },
    /// Pressed and released without passing the activation distance.
    Click(TaskId),
    /// The gesture was abandoned; nothing to apply.
    Cancelled,
}

/// Tracks one drag gesture at a time.
#[derive(Debug, Clone)]
pub struct DragSession {
    state: DragState,
    activation_distance: f64,
}

impl DragSession {
    /// Creates an idle session with the given activation distance.
    #[must_use]
    pub const fn new(activation_distance: f64) -> Self {
        Self {
            state: DragState::Idle,
            activation_distance,
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    /// Returns `true` while no gesture is in progress.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Returns `true` once a card is grasped.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Returns `true` for a pressed or dragging pointer gesture, so pointer
    /// events do not end a keyboard gesture.
    #[must_use]
    pub const fn is_pointer_gesture(&self) -> bool {
        matches!(
            self.state,
            DragState::Pending { .. }
                | DragState::Dragging {
                    pointer: Some(_),
                    ..
                }
        )
    }

    /// The grasped task, for rendering it differently.
    #[must_use]
    pub const fn active(&self) -> Option<&TaskId> {
        match &self.state {
            DragState::Dragging { task_id, .. } => Some(task_id),
            _ => None,
        }
    }

    /// The current drop candidate, for highlighting it.
    #[must_use]
    pub const fn over(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Dragging { over, .. } => over.as_ref(),
            _ => None,
        }
    }

    /// The last pointer position of a pointer gesture.
    #[must_use]
    pub const fn pointer(&self) -> Option<Point> {
        match &self.state {
            DragState::Dragging { pointer, .. } => *pointer,
            _ => None,
        }
    }

    /// Pointer pressed on a card. Ignored unless idle.
    pub fn pointer_down(&mut self, task_id: TaskId, at: Point) {
        if !self.is_idle() {
            tracing::debug!(%task_id, "pointer_down ignored, gesture already active");
            return;
        }
        self.state = DragState::Pending {
            task_id,
            origin: at,
        };
    }

    /// Pointer moved to `at`, with `hit` being the drop target under it.
    ///
    /// Activates a pending press once it travels the activation distance,
    /// then tracks the candidate.
    pub fn pointer_move(&mut self, at: Point, hit: Option<DropTarget>) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::Pending { task_id, origin } => {
                if origin.distance(at) >= self.activation_distance {
                    let task_id = task_id.clone();
                    tracing::debug!(%task_id, "drag activated");
                    self.state = DragState::Dragging {
                        task_id,
                        over: hit,
                        pointer: Some(at),
                    };
                }
            }
            DragState::Dragging { over, pointer, .. } => {
                *over = hit;
                *pointer = Some(at);
            }
        }
    }

    /// Pointer released. Returns how the gesture ended, or `None` if idle.
    pub fn pointer_up(&mut self) -> Option<DragEnd> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => None,
            DragState::Pending { task_id, .. } => Some(DragEnd::Click(task_id)),
            DragState::Dragging { task_id, over, .. } => Some(DragEnd::Commit {
                active: task_id,
                target: over,
            }),
        }
    }

    /// Keyboard grasp: starts dragging immediately, with the card itself as
    /// the candidate. Ignored unless idle or if the task is not on the board.
    pub fn pick_up(&mut self, task_id: TaskId, tasks: &[Task]) {
        if !self.is_idle() {
            tracing::debug!(%task_id, "pick_up ignored, gesture already active");
            return;
        }
        if !tasks.iter().any(|t| t.id == task_id) {
            tracing::debug!(%task_id, "pick_up ignored, task not on board");
            return;
        }
        tracing::debug!(%task_id, "keyboard drag started");
        self.state = DragState::Dragging {
            over: Some(DropTarget::Task(task_id.clone())),
            task_id,
            pointer: None,
        };
    }

    /// Keyboard step of the candidate. Ignored unless dragging.
    pub fn key_move(&mut self, direction: KeyDirection, tasks: &[Task]) {
        if let DragState::Dragging { task_id, over, .. } = &mut self.state {
            *over = next_candidate(task_id, over.as_ref(), direction, tasks);
        }
    }

    /// Keyboard release. Same as [`DragSession::pointer_up`], but a pending
    /// press is not a keyboard gesture and is left alone.
    pub fn release(&mut self) -> Option<DragEnd> {
        if self.is_dragging() {
            self.pointer_up()
        } else {
            None
        }
    }

    /// Abandons the gesture. The caller applies nothing.
    pub fn cancel(&mut self) -> Option<DragEnd> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => None,
            state => {
                tracing::debug!(?state, "drag cancelled");
                Some(DragEnd::Cancelled)
            }
        }
    }
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DISTANCE)
    }
}
