#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;

/// A monitored folder and a backup root, both in one temp directory.
pub struct Folders {
    _root: TempDir,
    pub monitored: PathBuf,
    pub backups: PathBuf,
}

impl Folders {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let monitored = root.path().join("saves");
        let backups = root.path().join("backups");
        fs::create_dir(&monitored).expect("create monitored dir");
        fs::create_dir(&backups).expect("create backup dir");
        Self {
            _root: root,
            monitored,
            backups,
        }
    }

    /// Write (or overwrite) a file in the monitored folder.
    pub fn write_save(&self, basename: &str, contents: &[u8]) -> PathBuf {
        let path = self.monitored.join(basename);
        fs::write(&path, contents).expect("write save file");
        path
    }

    pub fn snapshot_dir(&self, basename: &str) -> PathBuf {
        self.backups.join(basename)
    }

    /// Sorted file names inside the snapshot directory of `basename`.
    pub fn snapshots(&self, basename: &str) -> Vec<String> {
        list_files(&self.snapshot_dir(basename))
    }

    /// Put a snapshot of `basename` dated `day` at `hms` into place, as if an
    /// earlier run had taken it.
    pub fn seed_snapshot(&self, basename: &str, day: NaiveDate, hms: (u32, u32, u32)) -> PathBuf {
        let dir = self.snapshot_dir(basename);
        fs::create_dir_all(&dir).expect("create snapshot dir");
        let name = format!(
            "{basename}.{}--{:02}-{:02}-{:02}",
            day.format("%Y-%m-%d"),
            hms.0,
            hms.1,
            hms.2
        );
        let path = dir.join(name);
        fs::write(&path, b"seeded").expect("write seeded snapshot");
        path
    }

    /// Drop a file that is not a snapshot into the snapshot directory.
    pub fn seed_foreign(&self, basename: &str, name: &str) -> PathBuf {
        let dir = self.snapshot_dir(basename);
        fs::create_dir_all(&dir).expect("create snapshot dir");
        let path = dir.join(name);
        fs::write(&path, b"foreign").expect("write foreign file");
        path
    }
}

impl Default for Folders {
    fn default() -> Self {
        Self::new()
    }
}

pub fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
