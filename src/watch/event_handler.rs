// src/watch/event_handler.rs

//! Bridge from filesystem notifications to the backup engine.
//!
//! The engine only ever sees basenames through [`FileChangeHandler`]; this is
//! the one place that knows about `notify` event kinds.

use std::path::PathBuf;

use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind};
use tracing::{debug, warn};

use crate::engine::BackupEngine;
use crate::engine::clock::Clock;
use crate::fs::FileSystem;
use crate::watch::path_utils::basename_of;

/// The two notification kinds the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Created,
    Modified,
}

/// One changed path inside the monitored folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsNotification {
    pub kind: NotificationKind,
    pub path: PathBuf,
    pub is_directory: bool,
}

/// Receiver of per-file change notifications.
pub trait FileChangeHandler {
    fn on_file_changed(&mut self, basename: &str);
}

impl<F: FileSystem, C: Clock> FileChangeHandler for BackupEngine<F, C> {
    fn on_file_changed(&mut self, basename: &str) {
        self.backup_file(basename);
    }
}

/// Turn a raw `notify` event into the notifications we care about.
///
/// Creations and modifications only; removals, accesses and the rest produce
/// nothing. Renames count as a creation of the destination; the source name
/// is gone and is never reported. A path counts as a directory if the backend
/// says so or if it is a directory on disk right now.
pub fn notifications_from_event(event: &Event) -> Vec<FsNotification> {
    let (kind, paths) = match event.kind {
        EventKind::Create(_) => (NotificationKind::Created, &event.paths[..]),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => return Vec::new(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            (NotificationKind::Created, &event.paths[..])
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let dest = event.paths.len().saturating_sub(1);
            (NotificationKind::Created, &event.paths[dest..])
        }
        EventKind::Modify(_) => (NotificationKind::Modified, &event.paths[..]),
        _ => return Vec::new(),
    };
    let folder_hint = matches!(event.kind, EventKind::Create(CreateKind::Folder));

    paths
        .iter()
        .map(|path| FsNotification {
            kind,
            path: path.clone(),
            is_directory: folder_hint || path.is_dir(),
        })
        .collect()
}

/// Deliver one notification to `handler`, synchronously.
///
/// Directory notifications are dropped; the monitored folder is not watched
/// recursively.
pub fn dispatch_notification<H: FileChangeHandler + ?Sized>(
    handler: &mut H,
    notification: &FsNotification,
) {
    if notification.is_directory {
        debug!(path = ?notification.path, "ignoring directory event");
        return;
    }

    match basename_of(&notification.path) {
        Some(basename) => {
            debug!(kind = ?notification.kind, %basename, "file changed");
            handler.on_file_changed(basename);
        }
        None => warn!(path = ?notification.path, "event path has no usable file name"),
    }
}
