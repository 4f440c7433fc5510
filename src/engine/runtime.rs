// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::watch::{dispatch_notification, FileChangeHandler, FsNotification};

/// Events flowing into the runtime from the watcher and the signal handler.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A path inside the monitored folder was created or modified.
    FileChanged(FsNotification),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Feeds notifications to a [`FileChangeHandler`] one at a time.
///
/// This is the only owner of the handler, so the backup engine's record
/// store is never touched from two places at once. Handling is blocking
/// (file copies, directory listings) and runs inline via
/// `tokio::task::block_in_place`, which needs the multi-threaded runtime.
pub struct Runtime<H: FileChangeHandler> {
    handler: H,
    event_rx: mpsc::UnboundedReceiver<RuntimeEvent>,
}

impl<H: FileChangeHandler> fmt::Debug for Runtime<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime").finish_non_exhaustive()
    }
}

impl<H: FileChangeHandler> Runtime<H> {
    pub fn new(handler: H, event_rx: mpsc::UnboundedReceiver<RuntimeEvent>) -> Self {
        Self { handler, event_rx }
    }

    /// Main event loop.
    ///
    /// Returns once shutdown is requested or every sender (watcher, signal
    /// handler) is gone. A notification being handled when shutdown arrives is
    /// always finished first. The handler is handed back to the caller.
    pub async fn run(mut self) -> Result<H> {
        info!("savewatch runtime started");

        while let Some(event) = self.event_rx.recv().await {
            match event {
                RuntimeEvent::FileChanged(notification) => {
                    debug!(?notification, "runtime received notification");
                    let handler = &mut self.handler;
                    tokio::task::block_in_place(|| dispatch_notification(handler, &notification));
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    return Ok(self.handler);
                }
            }
        }

        info!("runtime event channel closed; exiting");
        Ok(self.handler)
    }
}
