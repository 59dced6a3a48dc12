//! Application state and event handling.

use std::fmt::Write as _;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use kanboard_proto::codec::BoardSnapshot;
use kanboard_proto::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use ratatui::layout::Rect;

use crate::drag::{DragEnd, DragSession, KeyDirection, Point};
use crate::persist::BoardSink;
use crate::tasks::TaskStore;
use crate::ui::layout::{BoardLayout, split_screen};

/// Fallback when the configured timestamp format is invalid.
const FALLBACK_TIMESTAMP_FORMAT: &str = "%H:%M";

/// What a submitted form does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    /// Adds a new task.
    Create,
    /// Edits an existing task.
    Edit(TaskId),
}

/// The focused field of the task form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Title text.
    Title,
    /// Description text.
    Description,
    /// Priority selector.
    Priority,
    /// Status selector.
    Status,
}

impl FormField {
    /// Fields in tab order.
    pub const ALL: [Self; 4] = [Self::Title, Self::Description, Self::Priority, Self::Status];

    const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Priority,
            Self::Priority => Self::Status,
            Self::Status => Self::Title,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Title => Self::Status,
            Self::Description => Self::Title,
            Self::Priority => Self::Description,
            Self::Status => Self::Priority,
        }
    }
}

/// The create/edit popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    /// What submitting does.
    pub target: FormTarget,
    /// Field values being edited.
    pub draft: TaskDraft,
    /// The focused field.
    pub field: FormField,
    /// Validation error from the last submit.
    pub error: Option<String>,
}

impl TaskForm {
    fn create(status: TaskStatus) -> Self {
        Self {
            target: FormTarget::Create,
            draft: TaskDraft::default().with_status(status),
            field: FormField::Title,
            error: None,
        }
    }

    fn edit(task: &Task) -> Self {
        Self {
            target: FormTarget::Edit(task.id.clone()),
            draft: task.to_draft(),
            field: FormField::Title,
            error: None,
        }
    }
}

/// Top-level input mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Board navigation and drag gestures.
    Board,
    /// A create/edit form is open.
    Form(TaskForm),
}

/// Severity of a status-bar notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Something failed.
    Error,
}

/// A one-line message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub text: String,
}

/// Main application state.
pub struct App {
    /// The task collection.
    pub store: TaskStore,
    /// The drag gesture in progress, if any.
    pub drag: DragSession,
    /// Current input mode.
    pub mode: Mode,
    /// Lane holding the keyboard focus.
    pub focus_lane: TaskStatus,
    /// The selected card.
    pub selected: Option<TaskId>,
    /// Last notice for the status bar.
    pub notice: Option<Notice>,
    /// Whether the app should quit.
    pub should_quit: bool,
    viewport: Rect,
    sink: Option<Box<dyn BoardSink>>,
    saved_revision: u64,
    last_saved: Option<chrono::DateTime<chrono::Local>>,
    timestamp_format: String,
}

impl App {
    /// Creates an app over `store`, selecting the first card of the first lane.
    #[must_use]
    pub fn new(store: TaskStore) -> Self {
        let saved_revision = store.revision();
        let mut app = Self {
            store,
            drag: DragSession::default(),
            mode: Mode::Board,
            focus_lane: TaskStatus::Todo,
            selected: None,
            notice: None,
            should_quit: false,
            viewport: Rect::default(),
            sink: None,
            saved_revision,
            last_saved: None,
            timestamp_format: FALLBACK_TIMESTAMP_FORMAT.to_string(),
        };
        app.ensure_selection();
        app
    }

    /// Sets how far the pointer travels before a press becomes a drag.
    #[must_use]
    pub fn with_activation_distance(mut self, cells: f64) -> Self {
        self.drag = DragSession::new(cells);
        self
    }

    /// Saves the board to `sink` after every committed change.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn BoardSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Sets the chrono format used for the "saved" timestamp.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Records the terminal size. Layout and hit testing derive from it.
    pub const fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    /// The board geometry for the current viewport.
    #[must_use]
    pub fn layout(&self) -> BoardLayout {
        let (board, _) = split_screen(self.viewport);
        BoardLayout::compute(board, self.store.tasks())
    }

    /// The selected task, if it still exists.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.as_ref().and_then(|id| self.store.get(id))
    }

    /// When the board was last saved, formatted for display.
    #[must_use]
    pub fn last_saved_label(&self) -> Option<String> {
        let at = self.last_saved?;
        let mut label = String::new();
        if write!(label, "{}", at.format(&self.timestamp_format)).is_err() {
            label.clear();
            let _ = write!(label, "{}", at.format(FALLBACK_TIMESTAMP_FORMAT));
        }
        Some(label)
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if !self.drag.is_idle() {
            self.handle_drag_key(key);
            return;
        }

        match self.mode {
            Mode::Board => self.handle_board_key(key),
            Mode::Form(_) => self.handle_form_key(key),
        }
    }

    /// Handle a mouse event. Only the left button drives gestures.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if matches!(self.mode, Mode::Form(_)) {
            return;
        }
        let at = Point::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !self.drag.is_idle() {
                    return;
                }
                let layout = self.layout();
                if let Some(id) = layout.card_at(at.x, at.y).cloned() {
                    self.select(&id);
                    self.drag.pointer_down(id, at);
                } else if let Some(status) = layout.lane_at(at.x, at.y) {
                    self.focus_lane = status;
                    self.ensure_selection();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.drag.is_pointer_gesture() {
                    let hit = self.layout().hit_test(at.x, at.y);
                    self.drag.pointer_move(at, hit);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag.is_pointer_gesture() {
                    // Update the candidate to the release position first
                    let hit = self.layout().hit_test(at.x, at.y);
                    self.drag.pointer_move(at, hit);
                    if let Some(end) = self.drag.pointer_up() {
                        self.finish_gesture(end);
                    }
                }
            }
            _ => {}
        }
    }

    /// The terminal lost focus: abandon any gesture in progress.
    pub fn handle_focus_lost(&mut self) {
        if let Some(end) = self.drag.cancel() {
            self.finish_gesture(end);
        }
    }

    /// Saves the board if it changed since the last save.
    ///
    /// A failed save is logged and shown, and retried after the next change.
    pub fn persist_if_changed(&mut self) {
        let revision = self.store.revision();
        if revision == self.saved_revision {
            return;
        }
        let Some(sink) = &self.sink else {
            self.saved_revision = revision;
            return;
        };
        let snapshot = BoardSnapshot::new(self.store.tasks().to_vec());
        match sink.save(&snapshot) {
            Ok(()) => {
                tracing::debug!(revision, tasks = snapshot.tasks.len(), "board saved");
                self.saved_revision = revision;
                self.last_saved = Some(chrono::Local::now());
            }
            Err(e) => {
                tracing::warn!(revision, error = %e, "board save failed");
                self.saved_revision = revision;
                self.set_notice(NoticeLevel::Error, format!("Save failed: {e}"));
            }
        }
    }

    fn finish_gesture(&mut self, end: DragEnd) {
        match end {
            DragEnd::Commit { active, target } => {
                if self.store.apply_drop(&active, target.as_ref()) {
                    self.select(&active);
                }
            }
            DragEnd::Click(id) => self.select(&id),
            DragEnd::Cancelled => {
                self.set_notice(NoticeLevel::Info, "Drag cancelled");
            }
        }
    }

    fn handle_drag_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            if let Some(end) = self.drag.cancel() {
                self.finish_gesture(end);
            }
            return;
        }
        // Pointer gestures end with the pointer, keys only cancel them
        if self.drag.is_pointer_gesture() {
            return;
        }
        let direction = match key.code {
            KeyCode::Up | KeyCode::Char('k') => KeyDirection::Up,
            KeyCode::Down | KeyCode::Char('j') => KeyDirection::Down,
            KeyCode::Left | KeyCode::Char('h') => KeyDirection::Left,
            KeyCode::Right | KeyCode::Char('l') => KeyDirection::Right,
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(end) = self.drag.release() {
                    self.finish_gesture(end);
                }
                return;
            }
            _ => return,
        };
        self.drag.key_move(direction, self.store.tasks());
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('K') => self.shift_selected(KeyDirection::Up),
            KeyCode::Char('J') => self.shift_selected(KeyDirection::Down),
            KeyCode::Up if shift => self.shift_selected(KeyDirection::Up),
            KeyCode::Down if shift => self.shift_selected(KeyDirection::Down),
            KeyCode::Up | KeyCode::Char('k') => self.step_selection(KeyDirection::Up),
            KeyCode::Down | KeyCode::Char('j') => self.step_selection(KeyDirection::Down),
            KeyCode::Left | KeyCode::Char('h') => self.step_selection(KeyDirection::Left),
            KeyCode::Right | KeyCode::Char('l') => self.step_selection(KeyDirection::Right),
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected.clone() {
                    self.drag.pick_up(id, self.store.tasks());
                }
            }
            KeyCode::Char('a' | 'n') => {
                self.mode = Mode::Form(TaskForm::create(self.focus_lane));
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::Form(TaskForm::edit(task));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Char('s') => self.cycle_selected_status(),
            KeyCode::Char('p') => self.cycle_selected_priority(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Mode::Form(form) = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Board;
                return;
            }
            KeyCode::Enter => {
                self.submit_form();
                return;
            }
            KeyCode::Tab => form.field = form.field.next(),
            KeyCode::BackTab => form.field = form.field.previous(),
            code => match form.field {
                FormField::Title => edit_text(&mut form.draft.title, code),
                FormField::Description => edit_text(&mut form.draft.description, code),
                FormField::Priority => {
                    if matches!(code, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) {
                        form.draft.priority = form.draft.priority.cycle();
                    }
                }
                FormField::Status => match code {
                    KeyCode::Left => {
                        form.draft.status = form.draft.status.previous().unwrap_or(form.draft.status);
                    }
                    KeyCode::Right => {
                        form.draft.status = form.draft.status.next().unwrap_or(form.draft.status);
                    }
                    KeyCode::Char(' ') => form.draft.status = form.draft.status.cycle(),
                    _ => {}
                },
            },
        }
        form.error = None;
    }

    fn submit_form(&mut self) {
        let Mode::Form(form) = &self.mode else {
            return;
        };
        let draft = form.draft.clone();
        let result = match &form.target {
            FormTarget::Create => self.store.add(draft).map(|task| task.id),
            FormTarget::Edit(id) => {
                let id = id.clone();
                self.store
                    .update_fields(&id, &TaskPatch::from(draft))
                    .map(|()| id)
            }
        };
        match result {
            Ok(id) => {
                self.mode = Mode::Board;
                self.select(&id);
            }
            Err(e) => {
                tracing::debug!(error = %e, "form rejected");
                if let Mode::Form(form) = &mut self.mode {
                    form.error = Some(e.to_string());
                }
            }
        }
    }

    /// Moves the selection between cards or lanes.
    fn step_selection(&mut self, direction: KeyDirection) {
        match direction {
            KeyDirection::Left | KeyDirection::Right => {
                let next = if direction == KeyDirection::Left {
                    self.focus_lane.previous()
                } else {
                    self.focus_lane.next()
                };
                if let Some(lane) = next {
                    self.focus_lane = lane;
                    self.selected = None;
                    self.ensure_selection();
                }
            }
            KeyDirection::Up | KeyDirection::Down => {
                if let Some(sibling) = self.sibling(direction) {
                    self.selected = Some(sibling);
                }
            }
        }
    }

    /// Swaps the selected card with its lane neighbour.
    fn shift_selected(&mut self, direction: KeyDirection) {
        let (Some(id), Some(sibling)) = (self.selected.clone(), self.sibling(direction)) else {
            return;
        };
        if let Err(e) = self.store.reorder(&id, &sibling) {
            tracing::warn!(task_id = %id, error = %e, "reorder ignored");
        }
    }

    /// The card above or below the selection in the focused lane.
    fn sibling(&self, direction: KeyDirection) -> Option<TaskId> {
        let selected = self.selected.as_ref()?;
        let lane: Vec<&TaskId> = self.store.by_status(self.focus_lane).map(|t| &t.id).collect();
        let index = lane.iter().position(|id| *id == selected)?;
        let next = match direction {
            KeyDirection::Up => index.checked_sub(1)?,
            KeyDirection::Down => index + 1,
            KeyDirection::Left | KeyDirection::Right => return None,
        };
        lane.get(next).map(|id| (*id).clone())
    }

    fn remove_selected(&mut self) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        let lane: Vec<TaskId> = self
            .store
            .by_status(self.focus_lane)
            .map(|t| t.id.clone())
            .collect();
        let index = lane.iter().position(|t| t == &id);
        match self.store.remove(&id) {
            Ok(task) => {
                self.set_notice(NoticeLevel::Info, format!("Deleted \"{}\"", task.title));
                // Select the card that took its place, else the one above
                self.selected = index.and_then(|i| {
                    lane.get(i + 1)
                        .or_else(|| i.checked_sub(1).and_then(|j| lane.get(j)))
                        .cloned()
                });
                self.ensure_selection();
            }
            Err(e) => tracing::warn!(task_id = %id, error = %e, "remove ignored"),
        }
    }

    fn cycle_selected_status(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let (id, status) = (task.id.clone(), task.status.cycle());
        match self.store.update_status(&id, status) {
            Ok(()) => self.select(&id),
            Err(e) => tracing::warn!(task_id = %id, error = %e, "status change ignored"),
        }
    }

    fn cycle_selected_priority(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id.clone();
        let patch = TaskPatch {
            priority: Some(task.priority.cycle()),
            ..TaskPatch::default()
        };
        if let Err(e) = self.store.update_fields(&id, &patch) {
            tracing::warn!(task_id = %id, error = %e, "priority change ignored");
        }
    }

    /// Selects a task and focuses its lane.
    fn select(&mut self, id: &TaskId) {
        if let Some(task) = self.store.get(id) {
            self.focus_lane = task.status;
            self.selected = Some(task.id.clone());
        }
    }

    /// Keeps the selection on an existing card of the focused lane.
    fn ensure_selection(&mut self) {
        let valid = self
            .selected_task()
            .is_some_and(|task| task.status == self.focus_lane);
        if !valid {
            self.selected = self.store.by_status(self.focus_lane).next().map(|t| t.id.clone());
        }
    }

    fn set_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            text: text.into(),
        });
    }
}

/// Applies a key to a single-line text field.
fn edit_text(text: &mut String, code: KeyCode) {
    match code {
        KeyCode::Char(c) => text.push(c),
        KeyCode::Backspace => {
            text.pop();
        }
        _ => {}
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(TaskStore::seeded_demo())
    }
}
