//! Board persistence.
//!
//! Defines the [`BoardSink`] trait that receives the full task collection
//! after each committed change, plus [`BoardFile`], which keeps a postcard
//! snapshot on disk. Save failures are reported to the caller, which logs
//! them and keeps running; the in-memory board stays authoritative.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use kanboard_proto::codec::{self, BoardSnapshot, CodecError};

use crate::tasks::{TaskError, TaskStore};

/// Errors that can occur while loading or saving a board.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Failed to read the board file.
    #[error("failed to read board file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the board file.
    #[error("failed to write board file {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot could not be encoded or decoded.
    #[error("invalid board snapshot: {0}")]
    Codec(#[from] CodecError),

    /// The snapshot decoded but is not a valid board.
    #[error("invalid board: {0}")]
    Board(#[from] TaskError),
}

/// Receives the whole board after every committed change.
pub trait BoardSink {
    /// Persist a snapshot, replacing whatever was stored before.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the snapshot could not be stored.
    fn save(&self, snapshot: &BoardSnapshot) -> Result<(), PersistError>;
}

/// A board stored as a postcard snapshot file.
#[derive(Debug, Clone)]
pub struct BoardFile {
    path: PathBuf,
}

impl BoardFile {
    /// Creates a handle for the board file at `path`. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. A missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Read`] for I/O failures and
    /// [`PersistError::Codec`] for a corrupt or foreign snapshot.
    pub fn load(&self) -> Result<Option<BoardSnapshot>, PersistError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(codec::decode(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistError::Read {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// `<file name>.tmp` next to the board file.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl BoardSink for BoardFile {
    /// Writes to a sibling temp file and renames it over the board file, so
    /// a crash mid-write never leaves a truncated board behind.
    fn save(&self, snapshot: &BoardSnapshot) -> Result<(), PersistError> {
        let bytes = codec::encode(snapshot)?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;
        }
        let tmp = self.staging_path();
        std::fs::write(&tmp, bytes).map_err(|e| self.write_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.write_error(e))?;
        Ok(())
    }
}

/// In-memory sink that records every saved snapshot. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    saved: Rc<RefCell<Vec<BoardSnapshot>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots saved so far, oldest first.
    #[must_use]
    pub fn snapshots(&self) -> Vec<BoardSnapshot> {
        self.saved.borrow().clone()
    }

    /// The most recent snapshot.
    #[must_use]
    pub fn last(&self) -> Option<BoardSnapshot> {
        self.saved.borrow().last().cloned()
    }
}

impl BoardSink for MemorySink {
    fn save(&self, snapshot: &BoardSnapshot) -> Result<(), PersistError> {
        self.saved.borrow_mut().push(snapshot.clone());
        Ok(())
    }
}

/// Builds the starting store.
///
/// Loads `file` when given and present; otherwise starts from the demo
/// board when `seed_demo` is set, or from an empty board.
///
/// # Errors
///
/// Returns [`PersistError`] if an existing board file cannot be read or
/// holds an invalid board.
pub fn load_store(
    file: Option<&BoardFile>,
    seed_demo: bool,
    max_title_len: usize,
) -> Result<TaskStore, PersistError> {
    let loaded = match file {
        Some(file) => file.load()?,
        None => None,
    };
    let store = match loaded {
        Some(snapshot) => {
            tracing::info!(tasks = snapshot.tasks.len(), "board loaded");
            TaskStore::from_tasks(snapshot.tasks)?
        }
        None if seed_demo => TaskStore::seeded_demo(),
        None => TaskStore::new(),
    };
    Ok(store.with_max_title_len(max_title_len))
}
