//! Drag session control for the task board.
//!
//! A [`DragSession`] mediates one gesture from grasp to release. Pointer
//! and keyboard input feed the same candidate-target protocol; the store
//! is only touched once, when the caller applies the [`DragEnd::Commit`]
//! returned on release.

pub mod keyboard;
pub mod session;

pub use keyboard::{KeyDirection, next_candidate};
pub use session::{DEFAULT_ACTIVATION_DISTANCE, DragEnd, DragSession, DragState, Point};
