// crates/index/src/documents.rs
//! Reading the task directory for one generator run.

use std::path::Path;
use taskmgr_core::{extract_task, list_task_files, TaskFile, TaskRecord};
use tracing::debug;

use crate::error::GenerateError;

/// A task document with its extracted record.
#[derive(Debug, Clone)]
pub struct TaskDocument {
    pub file: TaskFile,
    pub content: String,
    pub record: TaskRecord,
}

/// Read and extract every task document, in artifact order.
///
/// Any read failure aborts the run.
pub async fn load_documents(task_dir: &Path) -> Result<Vec<TaskDocument>, GenerateError> {
    let files = list_task_files(task_dir).await?;
    let mut docs = Vec::with_capacity(files.len());
    for file in files {
        let content = tokio::fs::read_to_string(&file.path)
            .await
            .map_err(|e| GenerateError::read(&file.path, e))?;
        let record = extract_task(&content, &file.filename);
        docs.push(TaskDocument {
            file,
            content,
            record,
        });
    }
    sort_by_id(&mut docs, |d| d.record.id.as_str());
    debug!(dir = %task_dir.display(), count = docs.len(), "Loaded task documents");
    Ok(docs)
}

/// Stable byte-wise sort by id, so `["10", "2", "1"]` becomes `["1", "10", "2"]`.
///
/// Items arrive sorted by filename, which fixes the order of equal ids.
pub fn sort_by_id<T>(items: &mut [T], id: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| id(a).cmp(id(b)));
}
