//! Removal of staging files orphaned by interrupted runs.

use std::fs;
use std::path::Path;

use crate::staged::is_staging_file;

/// Remove every `*.tmp` staging file directly inside `dir`.
/// Returns the number of files removed. A missing directory is not an error.
pub fn cleanup_orphaned_staging(dir: &Path) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return 0,
    };

    let mut count = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_staging_file(&path) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => count += 1,
            Err(e) => tracing::warn!(path = %path.display(), "failed to remove staging file: {e}"),
        }
    }

    if count > 0 {
        tracing::info!(
            dir = %dir.display(),
            files_cleaned = count,
            "cleaned orphaned staging files from a previous run"
        );
    }
    count
}
