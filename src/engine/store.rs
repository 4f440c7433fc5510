// src/engine/store.rs

use std::collections::HashMap;

use super::FileRecord;

/// Per-basename bookkeeping owned by a single [`super::BackupEngine`].
///
/// Not synchronised: the engine is driven from one event loop at a time.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<String, FileRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, basename: &str) -> Option<&FileRecord> {
        self.records.get(basename)
    }

    /// Current record for `basename`, or a fresh one from `create` for a name
    /// seen for the first time. The fresh record is not stored until
    /// [`RecordStore::put`] is called.
    pub fn get_or_else(&self, basename: &str, create: impl FnOnce() -> FileRecord) -> FileRecord {
        self.records.get(basename).cloned().unwrap_or_else(create)
    }

    /// Store `record`, replacing whatever was kept under its basename.
    pub fn put(&mut self, record: FileRecord) {
        self.records.insert(record.basename.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn record(name: &str) -> FileRecord {
        FileRecord::new(name, Path::new("/m"), Path::new("/b"))
    }

    #[test]
    fn get_or_else_does_not_insert() {
        let store = RecordStore::new();
        let rec = store.get_or_else("a", || record("a"));
        assert_eq!(rec.basename, "a");
        assert!(store.is_empty());
    }

    #[test]
    fn put_replaces_by_basename() {
        let mut store = RecordStore::new();
        store.put(record("a"));
        let mut updated = record("a");
        updated.backup_dir = "/elsewhere".into();
        store.put(updated.clone());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a"), Some(&updated));
        assert_eq!(store.get_or_else("a", || record("zzz")), updated);
    }
}
