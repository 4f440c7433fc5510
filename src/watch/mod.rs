// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) on the
//!   monitored folder, non-recursively.
//! - Reducing raw events to create/modify notifications of files.
//! - Handing the basenames of changed files to a [`FileChangeHandler`].
//!
//! It does **not** know about debouncing or retention; that is the engine's
//! business.

pub mod event_handler;
pub mod path_utils;
pub mod watcher;

pub use event_handler::{
    dispatch_notification, notifications_from_event, FileChangeHandler, FsNotification,
    NotificationKind,
};
pub use watcher::{spawn_watcher, WatcherHandle};
