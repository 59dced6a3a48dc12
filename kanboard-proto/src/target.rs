//! Drop target descriptors.
//!
//! A drag gesture ends over a lane, over another card, or over nothing.
//! Renderers that identify droppable regions by string (one namespace for
//! cards and lanes) can convert with [`DropTarget::from_droppable_id`] and
//! [`DropTarget::droppable_id`]. Lanes use the `column-` prefix.

use serde::{Deserialize, Serialize};

use crate::task::{TaskId, TaskStatus};

/// Prefix marking a droppable id as a lane rather than a card.
pub const LANE_ID_PREFIX: &str = "column-";

/// The resolved target of a release event. "No target" is `None` at use sites.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropTarget {
    /// Dropped over a column, not onto a specific card.
    Lane(TaskStatus),
    /// Dropped onto a card.
    Task(TaskId),
}

impl DropTarget {
    /// Parses a droppable id.
    ///
    /// `column-<status>` is a lane, any other non-empty string is a card.
    /// Returns `None` for an empty id or a `column-` id naming no known
    /// status, which callers treat as "released over nothing".
    #[must_use]
    pub fn from_droppable_id(id: &str) -> Option<Self> {
        if id.is_empty() {
            return None;
        }
        match id.strip_prefix(LANE_ID_PREFIX) {
            Some(status) => status.parse().ok().map(Self::Lane),
            None => Some(Self::Task(TaskId::from_string(id))),
        }
    }

    /// Returns the droppable id string for this target.
    #[must_use]
    pub fn droppable_id(&self) -> String {
        match self {
            Self::Lane(status) => format!("{LANE_ID_PREFIX}{status}"),
            Self::Task(id) => id.to_string(),
        }
    }

    /// Returns the lane if this is a lane target.
    #[must_use]
    pub const fn lane(&self) -> Option<TaskStatus> {
        match self {
            Self::Lane(status) => Some(*status),
            Self::Task(_) => None,
        }
    }

    /// Returns the card id if this is a card target.
    #[must_use]
    pub const fn task_id(&self) -> Option<&TaskId> {
        match self {
            Self::Task(id) => Some(id),
            Self::Lane(_) => None,
        }
    }
}

impl std::fmt::Display for DropTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.droppable_id())
    }
}
