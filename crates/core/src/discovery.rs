// crates/core/src/discovery.rs
//! Task discovery.
//!
//! Scans the task directory for `*.md` documents. Listing is cheap (names and
//! metadata only); document text is read separately by whoever needs it.

use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::DiscoveryError;
use crate::naming::TASK_EXTENSION;
use crate::types::TaskFile;

/// List task documents in `task_dir`, sorted by filename.
///
/// Subdirectories and non-`.md` entries are skipped. Entries whose metadata
/// cannot be read are still listed with a zero mtime.
///
/// # Errors
/// Returns `DiscoveryError::TaskDirNotFound` if the directory is missing.
pub async fn list_task_files(task_dir: &Path) -> Result<Vec<TaskFile>, DiscoveryError> {
    let mut entries = fs::read_dir(task_dir)
        .await
        .map_err(|e| DiscoveryError::io(task_dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DiscoveryError::io(task_dir, e))?
    {
        let path = entry.path();
        let filename = entry.file_name().to_string_lossy().to_string();
        if !filename.ends_with(TASK_EXTENSION) {
            continue;
        }

        let metadata = match fs::metadata(&path).await {
            Ok(m) if m.is_dir() => continue,
            Ok(m) => Some(m),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Failed to stat task file");
                None
            }
        };

        let modified_ms = metadata
            .as_ref()
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        files.push(TaskFile {
            filename,
            path,
            modified_ms,
        });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    debug!(dir = %task_dir.display(), count = files.len(), "Listed task files");
    Ok(files)
}

/// Filenames only, sorted.
pub async fn list_task_filenames(task_dir: &Path) -> Result<Vec<String>, DiscoveryError> {
    Ok(list_task_files(task_dir)
        .await?
        .into_iter()
        .map(|f| f.filename)
        .collect())
}

/// First filename (in the given order) that belongs to task `id`.
pub fn find_by_id<'a>(filenames: &'a [String], id: &str) -> Option<&'a str> {
    let prefix = format!("{id}_");
    filenames
        .iter()
        .map(String::as_str)
        .find(|f| f.starts_with(&prefix))
}
