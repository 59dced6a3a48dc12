//! The task board core.
//!
//! [`TaskStore`] owns the ordered task collection and is its only mutation
//! surface. The [`resolve`] functions decide what a finished drag gesture
//! does to that collection; they are pure and never fail.

pub mod resolve;
pub mod store;

pub use resolve::{DropOutcome, array_move, plan_drop, resolve_drop};
pub use store::TaskStore;

use thiserror::Error;

/// Errors that can occur during task operations.
///
/// Every error leaves the collection unchanged, so callers driven by UI
/// events may log and ignore them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Task title cannot be empty or whitespace-only.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Task title exceeds the maximum length.
    #[error("task title too long (max {0} characters)")]
    TitleTooLong(usize),
    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    TaskNotFound(String),
    /// Two tasks in a seeded collection share an id.
    #[error("duplicate task id: {0}")]
    DuplicateId(String),
    /// A seeded task id is empty or collides with a lane id.
    #[error("invalid task id: {0:?}")]
    InvalidId(String),
}
