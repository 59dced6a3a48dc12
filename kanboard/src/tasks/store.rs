//! Task store: the ordered task collection and its mutation surface.
//!
//! Every mutation builds the next collection and swaps it in with
//! [`TaskStore::commit`], so observers only ever see whole snapshots.
//! The revision counter advances once per committed change.

use std::collections::HashSet;

use kanboard_proto::task::MAX_TASK_TITLE_LENGTH;
use kanboard_proto::{DropTarget, Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStatus};

use super::TaskError;
use super::resolve::plan_drop;

/// Owns the board's task collection.
#[derive(Debug, Clone)]
pub struct TaskStore {
    /// Tasks in collection order. Lanes are filters over this list.
    tasks: Vec<Task>,
    /// Maximum title length in characters.
    max_title_len: usize,
    /// Number of committed changes so far.
    revision: u64,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            max_title_len: MAX_TASK_TITLE_LENGTH,
            revision: 0,
        }
    }

    /// Creates a store holding an existing collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::DuplicateId`] if two tasks share an id, or
    /// [`TaskError::InvalidId`] for an empty or lane-shaped id.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, TaskError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !task.id.is_valid() {
                return Err(TaskError::InvalidId(task.id.to_string()));
            }
            if !seen.insert(&task.id) {
                return Err(TaskError::DuplicateId(task.id.to_string()));
            }
        }
        Ok(Self {
            tasks,
            ..Self::new()
        })
    }

    /// Creates a store with the demo board shown on first launch.
    #[must_use]
    pub fn seeded_demo() -> Self {
        let seed = [
            (
                "1",
                "Set up the development environment",
                "Install the toolchain and the project dependencies.",
                TaskStatus::Todo,
                Priority::High,
            ),
            (
                "2",
                "Build the login component",
                "Create the user interface and wire it to the authentication API.",
                TaskStatus::InProgress,
                Priority::High,
            ),
            (
                "3",
                "Implement the client dashboard",
                "Build the client panel and its features.",
                TaskStatus::Done,
                Priority::Medium,
            ),
            (
                "4",
                "Review code and tune performance",
                "Run a code review and apply performance fixes.",
                TaskStatus::Todo,
                Priority::Medium,
            ),
        ];
        let tasks = seed
            .into_iter()
            .map(|(id, title, description, status, priority)| Task {
                id: TaskId::from(id),
                title: title.to_string(),
                description: description.to_string(),
                status,
                priority,
            })
            .collect();
        Self {
            tasks,
            ..Self::new()
        }
    }

    /// Sets the maximum title length in characters.
    #[must_use]
    pub const fn with_max_title_len(mut self, max_title_len: usize) -> Self {
        self.max_title_len = max_title_len;
        self
    }

    /// All tasks in collection order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the board has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of committed changes since the store was created.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// The tasks of one lane, in collection order.
    ///
    /// The iterator is lazy and can be cloned to restart it.
    pub fn by_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> + Clone + '_ {
        self.tasks.iter().filter(move |t| t.status == status)
    }

    /// Validates a draft, assigns a fresh id and appends the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TitleEmpty`] for a blank title or
    /// [`TaskError::TitleTooLong`] past the configured maximum.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Task, TaskError> {
        self.validate_title(&draft.title)?;

        let task = Task::from_draft(self.fresh_id(), draft);
        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next);

        tracing::debug!(task_id = %task.id, status = %task.status, "task added");
        Ok(task)
    }

    /// Sets a task's status in place. Its collection index is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] if no task has this id.
    pub fn update_status(&mut self, id: &TaskId, status: TaskStatus) -> Result<(), TaskError> {
        self.update_fields(
            id,
            &TaskPatch {
                status: Some(status),
                ..TaskPatch::default()
            },
        )
    }

    /// Applies a partial update to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] for an unknown id, or a title
    /// error if the patch sets an invalid title. Nothing is applied on error.
    pub fn update_fields(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<(), TaskError> {
        let index = self.index_of(id)?;
        if let Some(title) = &patch.title {
            self.validate_title(title)?;
        }

        let mut task = self.tasks[index].clone();
        patch.apply_to(&mut task);
        if task == self.tasks[index] {
            return Ok(());
        }

        let mut next = self.tasks.clone();
        next[index] = task;
        self.commit(next);

        tracing::debug!(task_id = %id, "task updated");
        Ok(())
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] if no task has this id.
    pub fn remove(&mut self, id: &TaskId) -> Result<Task, TaskError> {
        let index = self.index_of(id)?;
        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next);

        tracing::debug!(task_id = %id, "task removed");
        Ok(removed)
    }

    /// Moves `source` to the index currently held by `target`.
    ///
    /// Tasks in between shift by one slot and every status is preserved.
    /// Reordering a task onto itself is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] if either id is unknown.
    pub fn reorder(&mut self, source: &TaskId, target: &TaskId) -> Result<(), TaskError> {
        let from = self.index_of(source)?;
        let to = self.index_of(target)?;
        if from == to {
            return Ok(());
        }
        let next = super::resolve::array_move(&self.tasks, from, to);
        self.commit(next);

        tracing::debug!(%source, %target, from, to, "task reordered");
        Ok(())
    }

    /// Resolves a finished drag gesture and commits the result.
    ///
    /// Returns `true` if the collection changed. Unknown ids and missing
    /// targets are no-ops.
    pub fn apply_drop(&mut self, active: &TaskId, target: Option<&DropTarget>) -> bool {
        let outcome = plan_drop(active, target, &self.tasks);
        if outcome.is_unchanged() {
            tracing::debug!(
                task_id = %active,
                target = ?target.map(DropTarget::droppable_id),
                "drop resolved to no-op"
            );
            return false;
        }
        let next = outcome.apply(&self.tasks);
        self.commit(next);

        tracing::info!(task_id = %active, ?outcome, "drop committed");
        true
    }

    /// Replaces the whole collection and advances the revision.
    fn commit(&mut self, next: Vec<Task>) {
        self.tasks = next;
        self.revision += 1;
    }

    /// Returns an id that no current task uses.
    fn fresh_id(&self) -> TaskId {
        loop {
            let id = TaskId::new();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn index_of(&self, id: &TaskId) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))
    }

    fn validate_title(&self, title: &str) -> Result<(), TaskError> {
        if title.trim().is_empty() {
            return Err(TaskError::TitleEmpty);
        }
        if title.chars().count() > self.max_title_len {
            return Err(TaskError::TitleTooLong(self.max_title_len));
        }
        Ok(())
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}
