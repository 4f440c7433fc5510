// src/engine/retention.rs

//! Day-bucketed retention of dated snapshots.
//!
//! A snapshot of `save.dat` taken at 2024-05-10 18:03:07 local time is stored
//! as `save.dat.2024-05-10--18-03-07`; its day bucket is `2024-05-10`. A sweep
//! keeps every snapshot from the `depth` most recent day buckets present and
//! deletes the rest. Anything in the directory that does not follow that
//! naming scheme is left alone.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Local, TimeDelta};
use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::engine::is_due;
use crate::fs::FileSystem;

/// `strftime` pattern of the snapshot extension.
pub const SNAPSHOT_EXTENSION_FORMAT: &str = "%Y-%m-%d--%H-%M-%S";

static SNAPSHOT_EXTENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})--\d{2}-\d{2}-\d{2}$")
        .expect("snapshot extension regex is valid")
});

pub fn snapshot_file_name(basename: &str, at: DateTime<Local>) -> String {
    format!("{basename}.{}", at.format(SNAPSHOT_EXTENSION_FORMAT))
}

/// Day bucket (`YYYY-MM-DD`) of `filename` if it is a snapshot of `basename`.
pub fn snapshot_day<'a>(filename: &'a str, basename: &str) -> Option<&'a str> {
    let extension = filename.strip_prefix(basename)?.strip_prefix('.')?;
    let captures = SNAPSHOT_EXTENSION_RE.captures(extension)?;
    captures.get(1).map(|day| day.as_str())
}

/// Snapshots of `basename` among `filenames` that fall outside the
/// `depth_days` most recent day buckets.
///
/// Returns nothing when there are at most `depth_days` distinct days.
pub fn plan_deletions<'a, I>(filenames: I, basename: &str, depth_days: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    // `YYYY-MM-DD` sorts chronologically as a string.
    let mut by_day: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for filename in filenames {
        if let Some(day) = snapshot_day(filename, basename) {
            by_day.entry(day).or_default().push(filename);
        }
    }

    if by_day.len() <= depth_days {
        return Vec::new();
    }

    let expired_days = by_day.len() - depth_days;
    by_day
        .into_values()
        .take(expired_days)
        .flatten()
        .map(str::to_string)
        .collect()
}

/// What a call to [`sweep`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The cleanup period has not elapsed; the directory was not touched.
    NotDue,
    /// The backup directory is missing or unreadable; nothing was swept.
    Failed,
    /// The directory was listed and expired snapshots were removed.
    Swept { deleted: usize, failed: usize },
}

impl SweepOutcome {
    pub fn ran(&self) -> bool {
        matches!(self, SweepOutcome::Swept { .. })
    }
}

/// Apply retention to the snapshots of `basename` inside `backup_dir`, if the
/// last sweep is at least `cleanup_period` old.
///
/// Deletion is best-effort per file. The caller should record `now` as the new
/// cleanup time whenever the outcome [ran](SweepOutcome::ran), even if nothing
/// was deleted.
pub fn sweep<F: FileSystem + ?Sized>(
    fs: &F,
    backup_dir: &Path,
    basename: &str,
    depth_days: usize,
    now: DateTime<Local>,
    last_cleanup_time: Option<DateTime<Local>>,
    cleanup_period: TimeDelta,
) -> SweepOutcome {
    if !is_due(last_cleanup_time, cleanup_period, now) {
        return SweepOutcome::NotDue;
    }

    if !fs.is_dir(backup_dir) {
        error!(%basename, dir = ?backup_dir, "cleanup error: directory is missing");
        return SweepOutcome::Failed;
    }

    let entries = match fs.read_dir(backup_dir) {
        Ok(entries) => entries,
        Err(err) => {
            error!(%basename, dir = ?backup_dir, error = %err, "cleanup error: unable to list directory");
            return SweepOutcome::Failed;
        }
    };

    let filenames: Vec<String> = entries
        .iter()
        .filter(|path| fs.is_file(path))
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();

    let doomed = plan_deletions(filenames.iter().map(String::as_str), basename, depth_days);

    let mut deleted = 0;
    let mut failed = 0;
    for filename in &doomed {
        let path = backup_dir.join(filename);
        match fs.remove_file(&path) {
            Ok(()) => {
                debug!(%basename, file = %filename, "removed expired snapshot");
                deleted += 1;
            }
            Err(err) => {
                warn!(%basename, path = ?path, error = %err, "unable to remove expired snapshot");
                failed += 1;
            }
        }
    }

    if deleted > 0 || failed > 0 {
        info!(%basename, deleted, failed, "retention sweep finished");
    }

    SweepOutcome::Swept { deleted, failed }
}
