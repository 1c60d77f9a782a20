// crates/index/src/export.rs
//! `tasks.json`: every record as a flat, pretty-printed array.

use taskmgr_core::{ProjectLayout, TaskRecord};
use tracing::info;

use crate::documents::load_documents;
use crate::error::GenerateError;
use crate::writer::write_atomic;
use crate::ArtifactReport;

/// Serialize records without their `content`.
pub fn render_export(records: &[TaskRecord]) -> Result<String, GenerateError> {
    let stripped: Vec<TaskRecord> = records
        .iter()
        .map(|r| TaskRecord {
            content: None,
            ..r.clone()
        })
        .collect();
    serde_json::to_string_pretty(&stripped).map_err(|source| GenerateError::Serialize {
        artifact: "tasks.json",
        source,
    })
}

/// Regenerate `docs/logs/tasks.json`.
pub async fn generate_export(layout: &ProjectLayout) -> Result<ArtifactReport, GenerateError> {
    let records: Vec<TaskRecord> = load_documents(&layout.task_dir())
        .await?
        .into_iter()
        .map(|d| d.record)
        .collect();

    let path = layout.export_path();
    write_atomic(&path, render_export(&records)?).await?;

    info!(path = %path.display(), tasks = records.len(), "Exported tasks");
    Ok(ArtifactReport {
        artifact: "tasks.json",
        path,
        tasks: records.len(),
    })
}
