// src/engine/core.rs

//! The per-file backup state machine.
//!
//! Every observed change of a file in the monitored folder ends up in
//! [`BackupEngine::backup_file`], which runs, in order:
//!
//! 1. the basename filter,
//! 2. the debounce check against the file's last copy,
//! 3. the copy into `backup_folder/<basename>/<basename>.<timestamp>`,
//! 4. the retention sweep of that directory (if its period elapsed),
//! 5. a single write of the updated [`FileRecord`] back into the store.
//!
//! Nothing in here returns an error to the caller. Each failure is logged and
//! the file is simply retried on a later event, so monitoring never stops
//! because of one file.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

use crate::engine::clock::{Clock, SystemClock};
use crate::engine::retention::{snapshot_file_name, sweep};
use crate::engine::store::RecordStore;
use crate::engine::{is_due, FileRecord};
use crate::filter::BasenameFilter;
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::BackupOptions;

pub struct BackupEngine<F: FileSystem = RealFileSystem, C: Clock = SystemClock> {
    folder_to_monitor: PathBuf,
    backup_folder: PathBuf,
    options: BackupOptions,
    filter: Box<dyn BasenameFilter>,
    fs: F,
    clock: C,
    records: RecordStore,
}

impl<F: FileSystem, C: Clock> std::fmt::Debug for BackupEngine<F, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupEngine")
            .field("folder_to_monitor", &self.folder_to_monitor)
            .field("backup_folder", &self.backup_folder)
            .field("options", &self.options)
            .field("filter", &self.filter)
            .field("tracked_files", &self.records.len())
            .finish_non_exhaustive()
    }
}

impl BackupEngine {
    /// Engine on the real filesystem and system clock.
    ///
    /// Both folders must already exist and be distinct; the config loader
    /// guarantees that.
    pub fn new(
        folder_to_monitor: impl Into<PathBuf>,
        backup_folder: impl Into<PathBuf>,
        options: BackupOptions,
        filter: Box<dyn BasenameFilter>,
    ) -> Self {
        Self::with_parts(
            folder_to_monitor,
            backup_folder,
            options,
            filter,
            RealFileSystem,
            SystemClock,
        )
    }
}

impl<F: FileSystem, C: Clock> BackupEngine<F, C> {
    pub fn with_parts(
        folder_to_monitor: impl Into<PathBuf>,
        backup_folder: impl Into<PathBuf>,
        options: BackupOptions,
        filter: Box<dyn BasenameFilter>,
        fs: F,
        clock: C,
    ) -> Self {
        Self {
            folder_to_monitor: folder_to_monitor.into(),
            backup_folder: backup_folder.into(),
            options,
            filter,
            fs,
            clock,
            records: RecordStore::new(),
        }
    }

    /// Bookkeeping for `basename`, if any event for it got past the filter.
    pub fn record(&self, basename: &str) -> Option<&FileRecord> {
        self.records.get(basename)
    }

    /// Back up every file directly inside the monitored folder.
    ///
    /// Used once at startup so the current state is saved before live
    /// monitoring begins.
    pub fn backup_all_files(&mut self) {
        self.backup_all_files_while(|| true);
    }

    /// Same as [`backup_all_files`](Self::backup_all_files), but asks
    /// `keep_going` before each file and stops as soon as it says no.
    ///
    /// Returns `false` if the pass was cut short.
    pub fn backup_all_files_while(&mut self, mut keep_going: impl FnMut() -> bool) -> bool {
        let entries = match self.fs.read_dir(&self.folder_to_monitor) {
            Ok(entries) => entries,
            Err(err) => {
                error!(dir = ?self.folder_to_monitor, error = %err, "unable to list monitored folder");
                return true;
            }
        };

        let mut basenames: Vec<String> = Vec::with_capacity(entries.len());
        for path in entries {
            if !self.fs.is_file(&path) {
                continue;
            }
            match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => basenames.push(name.to_string()),
                None => warn!(path = ?path, "skipping file with a non UTF-8 name"),
            }
        }
        basenames.sort();

        for basename in basenames {
            if !keep_going() {
                info!(next = %basename, "backup of all files interrupted");
                return false;
            }
            self.backup_file(&basename);
        }
        true
    }

    /// React to a change of `basename` inside the monitored folder.
    pub fn backup_file(&mut self, basename: &str) {
        if !self.filter.should_monitor(basename) {
            return;
        }
        info!(%basename, "backup");

        let now = self.clock.now();
        let record = self.records.get_or_else(basename, || {
            FileRecord::new(basename, &self.folder_to_monitor, &self.backup_folder)
        });

        let record = self.copy_if_due(record, now);
        let record = self.cleanup_if_due(record, now);

        self.records.put(record);
    }

    fn copy_if_due(&self, record: FileRecord, now: DateTime<Local>) -> FileRecord {
        if !is_due(record.last_copy_time, self.options.min_update_interval(), now) {
            debug!(basename = %record.basename, "skip backup: too early");
            return record;
        }

        match self.copy_snapshot(&record, now) {
            Some(target) => {
                debug!(source = ?record.source_path, target = ?target, "copied");
                record.with_copy_time(now)
            }
            None => record,
        }
    }

    /// Copy the live file next to its older snapshots. `None` if the copy was
    /// skipped or failed; the reason has been logged.
    fn copy_snapshot(&self, record: &FileRecord, now: DateTime<Local>) -> Option<PathBuf> {
        let basename = &record.basename;

        if !self.fs.exists(&record.source_path) {
            error!(%basename, path = ?record.source_path, "skip backup: file not found");
            return None;
        }

        let target_dir = &record.backup_dir;
        if self.fs.exists(target_dir) {
            if !self.fs.is_dir(target_dir) {
                error!(
                    %basename,
                    dir = ?target_dir,
                    "skip backup: unable to create target dir (path already exists and is not directory)"
                );
                return None;
            }
        } else if let Err(err) = self.fs.create_dir_all(target_dir) {
            error!(%basename, dir = ?target_dir, error = %err, "skip backup: unable to create target dir");
            return None;
        }

        let target = target_dir.join(snapshot_file_name(basename, now));
        match self.fs.copy(&record.source_path, &target) {
            Ok(_) => Some(target),
            Err(err) => {
                error!(
                    %basename,
                    source = ?record.source_path,
                    target = ?target,
                    error = %err,
                    "unable to copy file"
                );
                None
            }
        }
    }

    fn cleanup_if_due(&self, record: FileRecord, now: DateTime<Local>) -> FileRecord {
        let outcome = sweep(
            &self.fs,
            &record.backup_dir,
            &record.basename,
            self.options.backup_depth_days,
            now,
            record.last_cleanup_time,
            self.options.cleanup_period(),
        );

        if outcome.ran() {
            record.with_cleanup_time(now)
        } else {
            record
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use crate::engine::ManualClock;
    use crate::filter::{AcceptAll, GameSaveFilter};
    use crate::fs::mock::MockFileSystem;
    use chrono::TimeDelta;

    const MONITORED: &str = "/saves";
    const BACKUPS: &str = "/backups";

    fn options() -> BackupOptions {
        BackupOptions {
            min_update_interval_sec: 10,
            backup_depth_days: 2,
            cleanup_period_sec: 3600,
        }
    }

    fn engine_with(
        filter: Box<dyn BasenameFilter>,
    ) -> (BackupEngine<MockFileSystem, ManualClock>, MockFileSystem, ManualClock) {
        let fs = MockFileSystem::new();
        fs.add_dir(MONITORED);
        fs.add_dir(BACKUPS);
        let clock = ManualClock::at_noon(2024, 5, 10).unwrap();
        let engine = BackupEngine::with_parts(
            MONITORED,
            BACKUPS,
            options(),
            filter,
            fs.clone(),
            clock.clone(),
        );
        (engine, fs, clock)
    }

    fn snapshot_dir(basename: &str) -> PathBuf {
        Path::new(BACKUPS).join(basename)
    }

    #[test]
    fn filtered_names_leave_no_trace() {
        let (mut engine, fs, _) = engine_with(Box::new(GameSaveFilter));
        fs.add_file("/saves/1.sav.bak", b"old".to_vec());

        engine.backup_file("1.sav.bak");

        assert_eq!(fs.write_count(), 0);
        assert!(engine.record("1.sav.bak").is_none());
        assert!(!fs.exists(&snapshot_dir("1.sav.bak")));
    }

    #[test]
    fn first_event_copies_and_sweeps() {
        let (mut engine, fs, clock) = engine_with(Box::new(AcceptAll));
        fs.add_file("/saves/save.dat", b"v1".to_vec());

        engine.backup_file("save.dat");

        let dir = snapshot_dir("save.dat");
        assert_eq!(fs.file_names(&dir), vec!["save.dat.2024-05-10--12-00-00"]);
        assert_eq!(fs.contents(dir.join("save.dat.2024-05-10--12-00-00")), Some(b"v1".to_vec()));

        let rec = engine.record("save.dat").unwrap();
        assert_eq!(rec.last_copy_time, Some(clock.now()));
        assert_eq!(rec.last_cleanup_time, Some(clock.now()));
    }

    #[test]
    fn debounce_window_blocks_second_copy() {
        let (mut engine, fs, clock) = engine_with(Box::new(AcceptAll));
        fs.add_file("/saves/save.dat", b"v1".to_vec());

        engine.backup_file("save.dat");
        clock.advance(TimeDelta::seconds(9));
        fs.add_file("/saves/save.dat", b"v2".to_vec());
        engine.backup_file("save.dat");

        assert_eq!(fs.file_names(snapshot_dir("save.dat")).len(), 1);

        clock.advance(TimeDelta::seconds(1));
        engine.backup_file("save.dat");

        assert_eq!(
            fs.file_names(snapshot_dir("save.dat")),
            vec!["save.dat.2024-05-10--12-00-00", "save.dat.2024-05-10--12-00-10"]
        );
    }

    #[test]
    fn missing_source_is_not_fatal() {
        let (mut engine, fs, _) = engine_with(Box::new(AcceptAll));

        engine.backup_file("gone.dat");

        let rec = engine.record("gone.dat").unwrap();
        assert_eq!(rec.last_copy_time, None);
        // No snapshot directory was created, so the sweep could not run either.
        assert_eq!(rec.last_cleanup_time, None);
        assert!(!fs.exists(&snapshot_dir("gone.dat")));
    }

    #[test]
    fn occupied_backup_path_skips_copy() {
        let (mut engine, fs, _) = engine_with(Box::new(AcceptAll));
        fs.add_file("/saves/save.dat", b"v1".to_vec());
        fs.add_file(snapshot_dir("save.dat"), b"not a dir".to_vec());

        engine.backup_file("save.dat");

        let rec = engine.record("save.dat").unwrap();
        assert_eq!(rec.last_copy_time, None);
        assert_eq!(fs.contents(snapshot_dir("save.dat")), Some(b"not a dir".to_vec()));
    }

    #[test]
    fn failed_copy_keeps_previous_copy_time() {
        let (mut engine, fs, clock) = engine_with(Box::new(AcceptAll));
        fs.add_file("/saves/save.dat", b"v1".to_vec());
        engine.backup_file("save.dat");
        let first_copy = clock.now();

        fs.fail_on("/saves/save.dat");
        clock.advance(TimeDelta::seconds(30));
        engine.backup_file("save.dat");
        assert_eq!(engine.record("save.dat").unwrap().last_copy_time, Some(first_copy));

        // Still due on the very next event, since the window counts from the
        // last successful copy.
        clock.advance(TimeDelta::seconds(1));
        engine.backup_file("save.dat");
        assert_eq!(engine.record("save.dat").unwrap().last_copy_time, Some(first_copy));
        assert_eq!(fs.file_names(snapshot_dir("save.dat")).len(), 1);
    }

    #[test]
    fn sweep_respects_cleanup_period() {
        let (mut engine, fs, clock) = engine_with(Box::new(AcceptAll));
        fs.add_file("/saves/save.dat", b"v1".to_vec());
        engine.backup_file("save.dat");
        let first_sweep = clock.now();

        // Old snapshots appear after the first sweep; they survive until the
        // cleanup period has elapsed.
        let dir = snapshot_dir("save.dat");
        fs.add_file(dir.join("save.dat.2024-05-01--08-00-00"), b"old".to_vec());
        fs.add_file(dir.join("save.dat.2024-05-02--08-00-00"), b"old".to_vec());

        clock.advance(TimeDelta::seconds(1800));
        engine.backup_file("save.dat");
        assert_eq!(engine.record("save.dat").unwrap().last_cleanup_time, Some(first_sweep));
        assert_eq!(fs.file_names(&dir).len(), 4);

        clock.advance(TimeDelta::seconds(1800));
        engine.backup_file("save.dat");
        assert_eq!(engine.record("save.dat").unwrap().last_cleanup_time, Some(clock.now()));
        assert_eq!(
            fs.file_names(&dir),
            vec![
                "save.dat.2024-05-02--08-00-00",
                "save.dat.2024-05-10--12-00-00",
                "save.dat.2024-05-10--12-30-00",
                "save.dat.2024-05-10--13-00-00",
            ]
        );
    }

    #[test]
    fn backup_all_files_covers_direct_children_only() {
        let (mut engine, fs, _) = engine_with(Box::new(GameSaveFilter));
        fs.add_file("/saves/1.sav", b"a".to_vec());
        fs.add_file("/saves/2.sav", b"b".to_vec());
        fs.add_file("/saves/2.sav.bak", b"c".to_vec());
        fs.add_file("/saves/nested/3.sav", b"d".to_vec());

        engine.backup_all_files();

        assert!(engine.record("1.sav").is_some());
        assert!(engine.record("2.sav").is_some());
        assert!(engine.record("2.sav.bak").is_none());
        assert!(engine.record("nested").is_none());
        assert!(engine.record("3.sav").is_none());
        assert_eq!(fs.file_names(snapshot_dir("1.sav")).len(), 1);
        assert_eq!(fs.file_names(snapshot_dir("2.sav")).len(), 1);
    }

    #[test]
    fn backup_all_files_stops_between_files_when_asked() {
        let (mut engine, fs, _) = engine_with(Box::new(AcceptAll));
        fs.add_file("/saves/1.sav", b"a".to_vec());
        fs.add_file("/saves/2.sav", b"b".to_vec());
        fs.add_file("/saves/3.sav", b"c".to_vec());

        let mut allowed = 1;
        let finished = engine.backup_all_files_while(|| {
            let go = allowed > 0;
            allowed -= 1;
            go
        });

        assert!(!finished);
        assert!(engine.record("1.sav").is_some());
        assert!(engine.record("2.sav").is_none());
        assert!(engine.record("3.sav").is_none());
        assert_eq!(fs.file_names(snapshot_dir("1.sav")).len(), 1);
    }

    #[test]
    fn backup_all_files_survives_missing_folder() {
        let (mut engine, fs, _) = engine_with(Box::new(AcceptAll));
        fs.delete(MONITORED);

        engine.backup_all_files();

        assert_eq!(fs.write_count(), 0);
    }
}
