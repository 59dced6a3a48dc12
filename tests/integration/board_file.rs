//! Integration tests for board persistence.
//!
//! Saves boards through the application and reloads them the way the
//! binary does at start.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kanboard::app::{App, NoticeLevel};
use kanboard::persist::{self, BoardFile, BoardSink, PersistError};
use kanboard_proto::codec::BoardSnapshot;
use kanboard_proto::{DropTarget, TaskId, TaskStatus};
use ratatui::layout::Rect;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("kanboard-it-{}", uuid::Uuid::now_v7()))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// A sink that always fails.
struct BrokenSink;

impl BoardSink for BrokenSink {
    fn save(&self, _snapshot: &BoardSnapshot) -> Result<(), PersistError> {
        Err(PersistError::Write {
            path: PathBuf::from("/dev/full"),
            source: std::io::Error::other("disk full"),
        })
    }
}

#[test]
fn committed_drop_survives_restart() {
    let dir = temp_dir();
    let file = BoardFile::new(dir.join("nested").join("board.bin"));

    let store = persist::load_store(Some(&file), true, 256).unwrap();
    let mut app = App::new(store).with_sink(Box::new(file.clone()));
    app.set_viewport(Rect::new(0, 0, 90, 30));
    assert!(
        app.store
            .apply_drop(&TaskId::from("1"), Some(&DropTarget::Lane(TaskStatus::Done)))
    );
    app.persist_if_changed();

    let reloaded = persist::load_store(Some(&file), true, 256).unwrap();
    assert_eq!(reloaded.tasks(), app.store.tasks());
    assert_eq!(
        reloaded.get(&TaskId::from("1")).unwrap().status,
        TaskStatus::Done
    );
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn emptied_board_is_not_reseeded() {
    let dir = temp_dir();
    let file = BoardFile::new(dir.join("board.bin"));

    let store = persist::load_store(Some(&file), true, 256).unwrap();
    let mut app = App::new(store).with_sink(Box::new(file.clone()));
    for id in ["1", "2", "3", "4"] {
        app.store.remove(&TaskId::from(id)).unwrap();
        app.persist_if_changed();
    }
    assert!(app.store.is_empty());

    let reloaded = persist::load_store(Some(&file), true, 256).unwrap();
    assert!(reloaded.is_empty());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn save_failure_is_reported_not_fatal() {
    let mut app = App::default().with_sink(Box::new(BrokenSink));
    app.handle_key_event(key(KeyCode::Char('s')));
    app.persist_if_changed();

    let notice = app.notice.clone().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.text.contains("disk full"));
    assert!(app.last_saved_label().is_none());
    assert!(!app.should_quit);
}

#[test]
fn corrupt_board_file_fails_to_load() {
    let dir = temp_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("board.bin");
    std::fs::write(&path, b"not a board").unwrap();

    let result = persist::load_store(Some(&BoardFile::new(&path)), true, 256);
    assert!(matches!(result, Err(PersistError::Codec(_))));
    let _ = std::fs::remove_dir_all(dir);
}
