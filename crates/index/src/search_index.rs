// crates/index/src/search_index.rs
//! `tasks_search.json`: full document text for the viewer's full-text mode.

use chrono::{DateTime, SecondsFormat, Utc};
use taskmgr_core::{ProjectLayout, SearchIndexDocument, SearchIndexEntry, SEARCH_INDEX_VERSION};
use tracing::info;

use crate::documents::{load_documents, TaskDocument};
use crate::error::GenerateError;
use crate::writer::write_atomic;
use crate::ArtifactReport;

/// ISO-8601 UTC with milliseconds, e.g. `2024-01-05T10:00:00.000Z`.
pub fn iso_millis(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn build_search_index(docs: &[TaskDocument], updated: i64) -> SearchIndexDocument {
    SearchIndexDocument {
        updated,
        version: SEARCH_INDEX_VERSION.to_string(),
        tasks: docs
            .iter()
            .map(|doc| SearchIndexEntry {
                id: doc.record.id.clone(),
                title: doc.record.title.clone(),
                status: doc.record.status.clone(),
                filename: doc.file.filename.clone(),
                content: doc.content.clone(),
                size: doc.content.encode_utf16().count(),
                last_modified: iso_millis(doc.file.modified_ms),
            })
            .collect(),
    }
}

/// Regenerate `docs/logs/tasks_search.json`.
pub async fn generate_search_index(layout: &ProjectLayout) -> Result<ArtifactReport, GenerateError> {
    let docs = load_documents(&layout.task_dir()).await?;
    let index = build_search_index(&docs, Utc::now().timestamp_millis());
    let json = serde_json::to_string_pretty(&index).map_err(|source| GenerateError::Serialize {
        artifact: "tasks_search.json",
        source,
    })?;

    let path = layout.search_index_path();
    write_atomic(&path, json).await?;

    info!(path = %path.display(), tasks = index.tasks.len(), "Generated search index");
    Ok(ArtifactReport {
        artifact: "tasks_search.json",
        path,
        tasks: index.tasks.len(),
    })
}
