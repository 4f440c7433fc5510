// src/engine/mod.rs

//! Backup scheduling and retention engine.
//!
//! - [`core`] holds [`BackupEngine`], the per-file state machine run for every
//!   change event: filter, debounce, copy, retention sweep, record update.
//! - [`retention`] decides which dated snapshots fall out of the retained day
//!   buckets and deletes them.
//! - [`store`] keeps one [`FileRecord`] per basename.
//! - [`runtime`] is the async shell feeding watcher notifications into the
//!   engine one at a time.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeDelta};

pub mod clock;
pub mod core;
pub mod retention;
pub mod runtime;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use self::core::BackupEngine;
pub use retention::{plan_deletions, snapshot_file_name, sweep, SweepOutcome};
pub use runtime::{Runtime, RuntimeEvent};
pub use store::RecordStore;

/// Bookkeeping for one monitored file.
///
/// Records are values: every decision produces a new record which replaces the
/// stored one. A `None` timestamp means "never happened", which makes the
/// first copy and the first sweep due immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub basename: String,
    pub source_path: PathBuf,
    pub backup_dir: PathBuf,
    pub last_copy_time: Option<DateTime<Local>>,
    pub last_cleanup_time: Option<DateTime<Local>>,
}

impl FileRecord {
    pub fn new(basename: &str, folder_to_monitor: &Path, backup_folder: &Path) -> Self {
        Self {
            basename: basename.to_string(),
            source_path: folder_to_monitor.join(basename),
            backup_dir: backup_folder.join(basename),
            last_copy_time: None,
            last_cleanup_time: None,
        }
    }

    pub fn with_copy_time(self, at: DateTime<Local>) -> Self {
        Self {
            last_copy_time: Some(at),
            ..self
        }
    }

    pub fn with_cleanup_time(self, at: DateTime<Local>) -> Self {
        Self {
            last_cleanup_time: Some(at),
            ..self
        }
    }
}

/// True once `period` has elapsed since `last`, or if `last` never happened.
///
/// A deadline past the representable range is never reached.
pub fn is_due(last: Option<DateTime<Local>>, period: TimeDelta, now: DateTime<Local>) -> bool {
    match last {
        None => true,
        Some(last) => last
            .checked_add_signed(period)
            .is_some_and(|next| now >= next),
    }
}
