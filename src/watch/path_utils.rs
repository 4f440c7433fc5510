// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

/// File name component of `path`, the key the backup engine tracks files by.
///
/// Returns `None` for paths without a final component (e.g. `/` or `..`) and
/// for names that are not valid UTF-8.
pub fn basename_of(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
