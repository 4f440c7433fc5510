// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::info;

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::watch::event_handler::notifications_from_event;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher on `root` (not recursive) that sends a
/// `RuntimeEvent::FileChanged` for every create/modify notification.
///
/// `notify` calls us on its own thread; the callback only converts and
/// forwards, the runtime loop does the actual work.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    runtime_tx: mpsc::UnboundedSender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for notification in notifications_from_event(&event) {
                    if runtime_tx.send(RuntimeEvent::FileChanged(notification)).is_err() {
                        // Runtime is gone; nothing left to deliver to.
                        return;
                    }
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "file watch error");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::NonRecursive)?;

    info!("file watcher started on {:?}", root);

    Ok(WatcherHandle { _inner: watcher })
}
