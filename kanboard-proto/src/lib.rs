//! Shared data model for the `Kanboard` task board.

pub mod codec;
pub mod target;
pub mod task;

pub use codec::{BoardSnapshot, CodecError};
pub use target::{DropTarget, LANE_ID_PREFIX};
pub use task::{Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
