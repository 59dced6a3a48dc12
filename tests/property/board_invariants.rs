//! Property-based tests for board invariants.
//!
//! Uses proptest to verify:
//! 1. Any drop preserves the multiset of task ids.
//! 2. The three lanes always partition the collection.
//! 3. Reordering a task onto itself never changes the board.
//! 4. A lane drop keeps the relative order of every other task.
//! 5. Random gesture sequences change the board at most once per release.
//! 6. Random bytes never cause a panic in snapshot decoding.
//! 7. Mixed store edits keep the size equal to adds minus removes.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use kanboard::drag::{DragEnd, DragSession, KeyDirection, Point};
use kanboard::tasks::{TaskStore, array_move, resolve_drop};
use kanboard_proto::codec;
use kanboard_proto::{DropTarget, Task, TaskDraft, TaskId, TaskStatus};
use proptest::prelude::*;

// --- Strategies ---

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Todo),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Done),
    ]
}

/// Boards of up to 12 tasks with ids "0".."n".
fn arb_board() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(arb_status(), 0..12).prop_map(|statuses| {
        statuses
            .into_iter()
            .enumerate()
            .map(|(i, status)| {
                Task::from_draft(
                    TaskId::from_string(i.to_string()),
                    TaskDraft::new(format!("task {i}")).with_status(status),
                )
            })
            .collect()
    })
}

/// Drop targets that may or may not exist on the board.
fn arb_target() -> impl Strategy<Value = Option<DropTarget>> {
    prop_oneof![
        Just(None),
        arb_status().prop_map(|s| Some(DropTarget::Lane(s))),
        (0usize..14).prop_map(|i| Some(DropTarget::Task(TaskId::from_string(i.to_string())))),
    ]
}

#[derive(Debug, Clone)]
enum Step {
    Down(usize, u16, u16),
    Move(u16, u16, Option<DropTarget>),
    Up,
    PickUp(usize),
    Key(KeyDirection),
    Release,
    Cancel,
}

fn arb_step() -> impl Strategy<Value = Step> {
    let direction = prop_oneof![
        Just(KeyDirection::Up),
        Just(KeyDirection::Down),
        Just(KeyDirection::Left),
        Just(KeyDirection::Right),
    ];
    prop_oneof![
        (0usize..14, any::<u8>(), any::<u8>())
            .prop_map(|(i, x, y)| Step::Down(i, u16::from(x), u16::from(y))),
        (any::<u8>(), any::<u8>(), arb_target())
            .prop_map(|(x, y, t)| Step::Move(u16::from(x), u16::from(y), t)),
        Just(Step::Up),
        (0usize..14).prop_map(Step::PickUp),
        direction.prop_map(Step::Key),
        Just(Step::Release),
        Just(Step::Cancel),
    ]
}

/// A task reference: an existing task picked by index, or an unknown id.
#[derive(Debug, Clone)]
enum Pick {
    Existing(prop::sample::Index),
    Stale,
}

#[derive(Debug, Clone)]
enum Edit {
    Add(String),
    Remove(Pick),
    Reorder(Pick, Pick),
    UpdateStatus(Pick, TaskStatus),
}

fn arb_pick() -> impl Strategy<Value = Pick> {
    prop_oneof![
        4 => any::<prop::sample::Index>().prop_map(Pick::Existing),
        1 => Just(Pick::Stale),
    ]
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    let title = prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[a-z]{1,12}",
    ];
    prop_oneof![
        title.prop_map(Edit::Add),
        arb_pick().prop_map(Edit::Remove),
        (arb_pick(), arb_pick()).prop_map(|(a, b)| Edit::Reorder(a, b)),
        (arb_pick(), arb_status()).prop_map(|(p, s)| Edit::UpdateStatus(p, s)),
    ]
}

fn resolve_pick(pick: &Pick, store: &TaskStore) -> TaskId {
    match pick {
        Pick::Existing(index) if !store.is_empty() => {
            store.tasks()[index.index(store.len())].id.clone()
        }
        _ => TaskId::from_string("missing"),
    }
}

fn lane_ids(store: &TaskStore) -> Vec<String> {
    let mut ids: Vec<String> = TaskStatus::ALL
        .into_iter()
        .flat_map(|s| store.by_status(s).map(|t| t.id.as_str().to_string()).collect::<Vec<_>>())
        .collect();
    ids.sort();
    ids
}

fn sorted_ids(tasks: &[Task]) -> Vec<String> {
    let mut ids: Vec<String> = tasks.iter().map(|t| t.id.as_str().to_string()).collect();
    ids.sort();
    ids
}

// --- Properties ---

proptest! {
    #[test]
    fn drop_preserves_ids(board in arb_board(), active in 0usize..14, target in arb_target()) {
        let active = TaskId::from_string(active.to_string());
        let next = resolve_drop(&active, target.as_ref(), &board);
        prop_assert_eq!(next.len(), board.len());
        prop_assert_eq!(sorted_ids(&next), sorted_ids(&board));
    }

    #[test]
    fn lanes_partition_board(board in arb_board(), active in 0usize..14, target in arb_target()) {
        let mut store = TaskStore::from_tasks(board).unwrap();
        store.apply_drop(&TaskId::from_string(active.to_string()), target.as_ref());

        prop_assert_eq!(lane_ids(&store), sorted_ids(store.tasks()));
    }

    #[test]
    fn self_reorder_is_identity(board in arb_board(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!board.is_empty());
        let id = board[pick.index(board.len())].id.clone();
        let mut store = TaskStore::from_tasks(board.clone()).unwrap();
        store.reorder(&id, &id).unwrap();
        prop_assert_eq!(store.tasks(), board.as_slice());
        prop_assert_eq!(store.revision(), 0);
    }

    #[test]
    fn lane_drop_keeps_other_order(board in arb_board(), pick in any::<prop::sample::Index>(), lane in arb_status()) {
        prop_assume!(!board.is_empty());
        let active = board[pick.index(board.len())].id.clone();
        let next = resolve_drop(&active, Some(&DropTarget::Lane(lane)), &board);

        let others = |tasks: &[Task]| -> Vec<Task> {
            tasks.iter().filter(|t| t.id != active).cloned().collect()
        };
        prop_assert_eq!(others(&next), others(&board));
        let moved = next.iter().find(|t| t.id == active).unwrap();
        prop_assert_eq!(moved.status, lane);
        if board.iter().any(|t| t.id == active && t.status != lane) {
            prop_assert_eq!(&next.last().unwrap().id, &active);
        }
    }

    #[test]
    fn array_move_places_item(len in 1usize..20, from in 0usize..20, to in 0usize..20) {
        let items: Vec<usize> = (0..len).collect();
        let moved = array_move(&items, from, to);
        prop_assert_eq!(moved.len(), len);
        if from < len && to < len {
            prop_assert_eq!(moved[to], from);
        } else {
            prop_assert_eq!(moved, items);
        }
    }

    #[test]
    fn gestures_commit_at_most_once_per_release(
        board in arb_board(),
        steps in prop::collection::vec(arb_step(), 0..40),
    ) {
        let mut store = TaskStore::from_tasks(board).unwrap();
        let mut session = DragSession::new(3.0);
        let mut releases = 0u64;

        for step in steps {
            let end = match step {
                Step::Down(i, x, y) => {
                    session.pointer_down(TaskId::from_string(i.to_string()), Point::new(x, y));
                    None
                }
                Step::Move(x, y, target) => {
                    let before = store.revision();
                    session.pointer_move(Point::new(x, y), target);
                    prop_assert_eq!(store.revision(), before);
                    None
                }
                Step::Up => session.pointer_up(),
                Step::PickUp(i) => {
                    session.pick_up(TaskId::from_string(i.to_string()), store.tasks());
                    None
                }
                Step::Key(direction) => {
                    session.key_move(direction, store.tasks());
                    None
                }
                Step::Release => session.release(),
                Step::Cancel => session.cancel(),
            };
            if let Some(DragEnd::Commit { active, target }) = end {
                releases += 1;
                let count = store.len();
                store.apply_drop(&active, target.as_ref());
                prop_assert_eq!(store.len(), count);
            }
        }
        prop_assert!(store.revision() <= releases);
    }

    #[test]
    fn size_tracks_adds_minus_removes(edits in prop::collection::vec(arb_edit(), 0..60)) {
        let mut store = TaskStore::new();
        let mut added = 0usize;
        let mut removed = 0usize;

        for edit in edits {
            match edit {
                Edit::Add(title) => {
                    let blank = title.trim().is_empty();
                    let result = store.add(TaskDraft::new(title));
                    prop_assert_eq!(result.is_ok(), !blank);
                    if result.is_ok() {
                        added += 1;
                    }
                }
                Edit::Remove(pick) => {
                    let id = resolve_pick(&pick, &store);
                    if store.remove(&id).is_ok() {
                        removed += 1;
                    }
                }
                Edit::Reorder(source, target) => {
                    let source = resolve_pick(&source, &store);
                    let target = resolve_pick(&target, &store);
                    let _ = store.reorder(&source, &target);
                }
                Edit::UpdateStatus(pick, status) => {
                    let id = resolve_pick(&pick, &store);
                    let _ = store.update_status(&id, status);
                }
            }
            prop_assert_eq!(store.len(), added - removed);
            prop_assert_eq!(lane_ids(&store), sorted_ids(store.tasks()));
        }
    }

    #[test]
    fn random_bytes_never_panic_decode(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = codec::decode(&bytes);
    }
}
