//! Board snapshot encoding.
//!
//! A [`BoardSnapshot`] is the full task collection in order, tagged with a
//! format version. It is what a persistence collaborator receives after
//! each committed change. Encoding uses postcard.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Error type for snapshot encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The snapshot was written by an unknown format version.
    #[error("unsupported snapshot version {0} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion(u16),
    /// Two tasks in the snapshot share an id.
    #[error("duplicate task id in snapshot: {0}")]
    DuplicateId(String),
    /// A task id is empty or collides with a lane id.
    #[error("invalid task id in snapshot: {0:?}")]
    InvalidId(String),
}

/// The full ordered task collection at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Format version, see [`SNAPSHOT_VERSION`].
    pub version: u16,
    /// Tasks in collection order.
    pub tasks: Vec<Task>,
}

impl BoardSnapshot {
    /// Wraps a task collection with the current version.
    #[must_use]
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            tasks,
        }
    }
}

/// Encodes a [`BoardSnapshot`] into a byte vector using postcard.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the snapshot cannot be serialized.
pub fn encode(snapshot: &BoardSnapshot) -> Result<Vec<u8>, CodecError> {
    postcard::to_allocvec(snapshot).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes and validates a [`BoardSnapshot`].
///
/// # Errors
///
/// Returns `CodecError::Serialization` for malformed bytes,
/// `CodecError::UnsupportedVersion` for a foreign version,
/// `CodecError::InvalidId` for an empty or `column-` id, and
/// `CodecError::DuplicateId` if two tasks share an id.
pub fn decode(bytes: &[u8]) -> Result<BoardSnapshot, CodecError> {
    let snapshot: BoardSnapshot =
        postcard::from_bytes(bytes).map_err(|e| CodecError::Serialization(e.to_string()))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(CodecError::UnsupportedVersion(snapshot.version));
    }
    let mut seen = HashSet::with_capacity(snapshot.tasks.len());
    for task in &snapshot.tasks {
        if !task.id.is_valid() {
            return Err(CodecError::InvalidId(task.id.to_string()));
        }
        if !seen.insert(&task.id) {
            return Err(CodecError::DuplicateId(task.id.to_string()));
        }
    }
    Ok(snapshot)
}
