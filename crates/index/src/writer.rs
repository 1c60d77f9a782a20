// crates/index/src/writer.rs
//! Atomic artifact writes.

use std::io::Write;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::GenerateError;

/// Write `content` to `path` through a temp file in the same directory.
///
/// The rename is atomic on the same filesystem, so readers see either the
/// previous artifact or the new one, never a truncated file.
pub async fn write_atomic(path: &Path, content: impl Into<Vec<u8>>) -> Result<(), GenerateError> {
    let content = content.into();
    let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| GenerateError::write(&dir, e))?;

    let bytes = content.len();
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || persist_in(&dir, &target, &content))
        .await
        .map_err(|e| GenerateError::write(path, std::io::Error::other(e)))??;

    debug!(path = %path.display(), bytes, "Wrote artifact");
    Ok(())
}

fn persist_in(dir: &Path, path: &Path, content: &[u8]) -> Result<(), GenerateError> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| GenerateError::write(path, e))?;
    tmp.write_all(content).map_err(|e| GenerateError::write(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| GenerateError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| GenerateError::write(path, e.error))?;
    Ok(())
}
