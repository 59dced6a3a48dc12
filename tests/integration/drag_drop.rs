//! Integration tests for drag-and-drop on the board.
//!
//! Drives complete gestures through the drag session and the task store,
//! and through the application key/mouse handlers.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use kanboard::app::App;
use kanboard::drag::{DragEnd, DragSession, KeyDirection, Point};
use kanboard::tasks::{TaskError, TaskStore};
use kanboard_proto::{DropTarget, Task, TaskDraft, TaskId, TaskStatus};
use ratatui::layout::Rect;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn task(id: &str, status: TaskStatus) -> Task {
    Task::from_draft(
        TaskId::from(id),
        TaskDraft::new(format!("task {id}")).with_status(status),
    )
}

/// `[1 todo, 2 todo, 3 done]`
fn small_board() -> TaskStore {
    TaskStore::from_tasks(vec![
        task("1", TaskStatus::Todo),
        task("2", TaskStatus::Todo),
        task("3", TaskStatus::Done),
    ])
    .unwrap()
}

fn snapshot(store: &TaskStore) -> Vec<(String, TaskStatus)> {
    store
        .tasks()
        .iter()
        .map(|t| (t.id.as_str().to_string(), t.status))
        .collect()
}

fn pairs(expected: &[(&str, TaskStatus)]) -> Vec<(String, TaskStatus)> {
    expected
        .iter()
        .map(|(id, status)| ((*id).to_string(), *status))
        .collect()
}

/// Runs a finished gesture against the store, the way the app does.
fn commit(store: &mut TaskStore, end: Option<DragEnd>) -> bool {
    match end {
        Some(DragEnd::Commit { active, target }) => store.apply_drop(&active, target.as_ref()),
        _ => false,
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn app_with(store: TaskStore) -> App {
    let mut app = App::new(store).with_activation_distance(2.0);
    app.set_viewport(Rect::new(0, 0, 90, 30));
    app
}

// ===========================================================================
// Store + session
// ===========================================================================

#[test]
fn drop_on_done_lane_moves_task_to_end() {
    let mut store = small_board();
    let mut session = DragSession::new(1.0);
    session.pointer_down(TaskId::from("1"), Point::new(0, 0));
    session.pointer_move(Point::new(50, 3), Some(DropTarget::Lane(TaskStatus::Done)));

    assert!(commit(&mut store, session.pointer_up()));
    assert_eq!(
        snapshot(&store),
        pairs(&[
            ("2", TaskStatus::Todo),
            ("3", TaskStatus::Done),
            ("1", TaskStatus::Done),
        ])
    );
}

#[test]
fn intermediate_candidates_do_not_touch_store() {
    let mut store = small_board();
    let mut session = DragSession::new(1.0);
    session.pointer_down(TaskId::from("1"), Point::new(0, 0));
    for (x, target) in [
        (5, Some(DropTarget::Task(TaskId::from("2")))),
        (30, Some(DropTarget::Lane(TaskStatus::InProgress))),
        (60, Some(DropTarget::Task(TaskId::from("3")))),
    ] {
        session.pointer_move(Point::new(x, 2), target);
        assert_eq!(store.revision(), 0);
    }
    session.pointer_move(Point::new(30, 2), Some(DropTarget::Lane(TaskStatus::InProgress)));

    assert!(commit(&mut store, session.pointer_up()));
    assert_eq!(store.revision(), 1);
    assert_eq!(
        store.get(&TaskId::from("1")).unwrap().status,
        TaskStatus::InProgress
    );
}

#[test]
fn cancelled_gesture_leaves_board_identical() {
    let mut store = small_board();
    let before = store.tasks().to_vec();
    let mut session = DragSession::new(1.0);
    session.pointer_down(TaskId::from("2"), Point::new(0, 0));
    session.pointer_move(Point::new(60, 2), Some(DropTarget::Lane(TaskStatus::Done)));

    assert_eq!(session.cancel(), Some(DragEnd::Cancelled));
    assert!(!commit(&mut store, session.pointer_up()));
    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(store.revision(), 0);
}

#[test]
fn same_lane_drop_reorders() {
    let mut store = TaskStore::from_tasks(vec![
        task("1", TaskStatus::Todo),
        task("2", TaskStatus::Todo),
        task("3", TaskStatus::Todo),
        task("4", TaskStatus::Todo),
    ])
    .unwrap();
    assert!(store.apply_drop(&TaskId::from("1"), Some(&DropTarget::Task(TaskId::from("3")))));
    let ids: Vec<_> = store.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["2", "3", "1", "4"]);
}

#[test]
fn cross_lane_drop_on_card_adopts_its_lane() {
    let mut store = small_board();
    assert!(store.apply_drop(&TaskId::from("1"), Some(&DropTarget::Task(TaskId::from("3")))));
    assert_eq!(
        snapshot(&store),
        pairs(&[
            ("2", TaskStatus::Todo),
            ("3", TaskStatus::Done),
            ("1", TaskStatus::Done),
        ])
    );
}

#[test]
fn drop_outside_any_target_is_noop() {
    let mut store = small_board();
    let mut session = DragSession::new(1.0);
    session.pointer_down(TaskId::from("1"), Point::new(0, 0));
    session.pointer_move(Point::new(10, 10), None);
    assert!(!commit(&mut store, session.pointer_up()));
    assert_eq!(store.revision(), 0);
}

#[test]
fn stale_ids_are_tolerated() {
    let mut store = small_board();
    let before = store.tasks().to_vec();
    let ghost = TaskId::from("gone");

    assert!(!store.apply_drop(&ghost, Some(&DropTarget::Lane(TaskStatus::Done))));
    assert!(!store.apply_drop(&TaskId::from("1"), Some(&DropTarget::Task(ghost.clone()))));
    assert_eq!(
        store.update_status(&ghost, TaskStatus::Done),
        Err(TaskError::TaskNotFound("gone".to_string()))
    );
    assert!(store.remove(&ghost).is_err());
    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn keyboard_gesture_through_session() {
    let mut store = small_board();
    let mut session = DragSession::default();
    session.pick_up(TaskId::from("2"), store.tasks());
    session.key_move(KeyDirection::Up, store.tasks());
    assert_eq!(session.over(), Some(&DropTarget::Task(TaskId::from("1"))));

    assert!(commit(&mut store, session.release()));
    let ids: Vec<_> = store.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["2", "1", "3"]);
}

#[test]
fn removing_grasped_task_makes_commit_noop() {
    let mut store = small_board();
    let mut session = DragSession::default();
    session.pick_up(TaskId::from("1"), store.tasks());
    session.key_move(KeyDirection::Right, store.tasks());
    store.remove(&TaskId::from("1")).unwrap();
    let revision = store.revision();

    assert!(!commit(&mut store, session.release()));
    assert_eq!(store.revision(), revision);
    assert_eq!(store.len(), 2);
}

// ===========================================================================
// Application handlers
// ===========================================================================

#[test]
fn app_mouse_drag_matches_end_to_end_scenario() {
    let mut app = app_with(small_board());
    // card 1 is the first card of the To Do lane
    app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 2));
    app.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 65, 20));
    app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 65, 20));

    assert_eq!(
        snapshot(&app.store),
        pairs(&[
            ("2", TaskStatus::Todo),
            ("3", TaskStatus::Done),
            ("1", TaskStatus::Done),
        ])
    );
    assert_eq!(app.selected, Some(TaskId::from("1")));
}

#[test]
fn app_keyboard_drag_matches_end_to_end_scenario() {
    let mut app = app_with(small_board());
    app.handle_key_event(key(KeyCode::Char(' ')));
    app.handle_key_event(key(KeyCode::Right));
    app.handle_key_event(key(KeyCode::Right));
    app.handle_key_event(key(KeyCode::Enter));

    assert_eq!(
        snapshot(&app.store),
        pairs(&[
            ("2", TaskStatus::Todo),
            ("3", TaskStatus::Done),
            ("1", TaskStatus::Done),
        ])
    );
}

#[test]
fn app_escape_cancels_mouse_drag() {
    let mut app = app_with(small_board());
    app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 2));
    app.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 65, 20));
    app.handle_key_event(key(KeyCode::Esc));
    app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 65, 20));

    assert_eq!(app.store.revision(), 0);
    assert!(!app.should_quit);
    assert!(app.drag.is_idle());
}

#[test]
fn app_keys_are_routed_to_gesture_while_dragging() {
    let mut app = app_with(small_board());
    app.handle_key_event(key(KeyCode::Char(' ')));
    // 'd' deletes on the board, but a gesture owns the keyboard
    app.handle_key_event(key(KeyCode::Char('d')));
    app.handle_key_event(key(KeyCode::Char('q')));
    assert_eq!(app.store.len(), 3);
    assert!(!app.should_quit);
    assert!(app.drag.is_dragging());
}

#[test]
fn app_drop_on_own_lane_is_noop() {
    let mut app = app_with(small_board());
    // empty area of the To Do lane, below both cards
    app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 6));
    app.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 20));
    app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 5, 20));
    assert_eq!(app.store.revision(), 0);
}
