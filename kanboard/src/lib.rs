//! `kanboard`: terminal Kanban board library.
//!
//! The task store and drop resolver live in [`tasks`], the gesture state
//! machine in [`drag`], and the terminal front end in [`app`] and [`ui`].

pub mod app;
pub mod config;
pub mod drag;
pub mod persist;
pub mod tasks;
pub mod ui;
