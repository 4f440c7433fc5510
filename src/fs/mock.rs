// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
}

#[derive(Debug, Default)]
struct MockState {
    entries: BTreeMap<PathBuf, MockEntry>,
    /// Paths whose copy (as source or target) or removal fails.
    failing: HashSet<PathBuf>,
    /// Number of successful mutating calls (create, copy, remove).
    writes: usize,
}

/// In-memory filesystem for tests.
///
/// Parent directories are created implicitly. Clones share the same state, so
/// a test can keep one handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = self.lock();
        if let Some(parent) = path.parent() {
            ensure_dirs(&mut state.entries, parent);
        }
        state
            .entries
            .insert(path.to_path_buf(), MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        ensure_dirs(&mut state.entries, path.as_ref());
    }

    /// Delete a file or directory (and everything under it), as an external
    /// process would.
    pub fn delete(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        state.entries.retain(|p, _| !p.starts_with(path));
    }

    /// Make every later `copy` touching `path` and every `remove_file` of
    /// `path` fail.
    pub fn fail_on(&self, path: impl AsRef<Path>) {
        self.lock().failing.insert(path.as_ref().to_path_buf());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.lock().entries.get(path.as_ref()) {
            Some(MockEntry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// Sorted names of the files directly inside `dir`.
    pub fn file_names(&self, dir: impl AsRef<Path>) -> Vec<String> {
        let dir = dir.as_ref();
        self.lock()
            .entries
            .iter()
            .filter(|(p, e)| matches!(e, MockEntry::File(_)) && p.parent() == Some(dir))
            .filter_map(|(p, _)| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes
    }
}

fn ensure_dirs(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        entries
            .entry(ancestor.to_path_buf())
            .or_insert(MockEntry::Dir);
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::Dir))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        if let Some(occupied) = path
            .ancestors()
            .find(|a| matches!(state.entries.get(*a), Some(MockEntry::File(_))))
        {
            return Err(anyhow!("Not a directory: {:?}", occupied));
        }
        ensure_dirs(&mut state.entries, path);
        state.writes += 1;
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<u64> {
        let mut state = self.lock();
        if state.failing.contains(from) || state.failing.contains(to) {
            return Err(anyhow!("Injected copy failure: {:?} -> {:?}", from, to));
        }
        let content = match state.entries.get(from) {
            Some(MockEntry::File(content)) => content.clone(),
            Some(MockEntry::Dir) => return Err(anyhow!("Is a directory: {:?}", from)),
            None => return Err(anyhow!("File not found: {:?}", from)),
        };
        match to.parent().and_then(|p| state.entries.get(p)) {
            Some(MockEntry::Dir) => {}
            _ => return Err(anyhow!("Parent directory missing: {:?}", to)),
        }
        let len = content.len() as u64;
        state.entries.insert(to.to_path_buf(), MockEntry::File(content));
        state.writes += 1;
        Ok(len)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::Dir) => Ok(state
                .entries
                .keys()
                .filter(|p| p.parent() == Some(path))
                .cloned()
                .collect()),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        if state.failing.contains(path) {
            return Err(anyhow!("Injected remove failure: {:?}", path));
        }
        match state.entries.get(path) {
            Some(MockEntry::File(_)) => {
                state.entries.remove(path);
                state.writes += 1;
                Ok(())
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}
