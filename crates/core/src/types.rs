// crates/core/src/types.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum number of feature bullets kept per task.
pub const MAX_FEATURES: usize = 3;

/// Version string written into every search index.
pub const SEARCH_INDEX_VERSION: &str = "1.0";

/// One task, as extracted from its document and filename.
///
/// Records are snapshots: a reload replaces the whole collection rather than
/// patching individual records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub filename: String,
    /// Raw document text. `None` until full-text search asks for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl TaskRecord {
    /// A record built from the filename alone (no document text read).
    pub fn from_filename(filename: &str) -> Self {
        Self {
            id: crate::naming::id_from_filename(filename).to_string(),
            title: crate::naming::title_from_filename(filename),
            status: crate::naming::status_from_filename(filename).to_string(),
            filename: filename.to_string(),
            ..Self::default()
        }
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

/// A task document found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFile {
    pub filename: String,
    pub path: PathBuf,
    /// Modification time in epoch milliseconds (0 if unavailable).
    pub modified_ms: i64,
}

/// The full-text search artifact (`tasks_search.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndexDocument {
    /// Generation time in epoch milliseconds.
    pub updated: i64,
    pub version: String,
    pub tasks: Vec<SearchIndexEntry>,
}

/// One task inside the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndexEntry {
    pub id: String,
    pub title: String,
    pub status: String,
    pub filename: String,
    pub content: String,
    /// Content length in UTF-16 code units.
    pub size: usize,
    /// ISO-8601 modification time.
    pub last_modified: String,
}
