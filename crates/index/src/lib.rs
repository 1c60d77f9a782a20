// crates/index/src/lib.rs
//! Generators for the derived task artifacts under `docs/logs/`.
//!
//! Each generator re-reads the task directory, renders its artifact in
//! full and replaces the previous file atomically:
//!
//! - `INDEX.md`: per-status counts and links ([`generate_overview`])
//! - `TASK_SUMMARY.md`: todo/backlog digest and dependency graph ([`generate_summary`])
//! - `tasks.json`: flat record export ([`generate_export`])
//! - `tasks_search.json`: records with full text ([`generate_search_index`])

pub mod documents;
pub mod error;
pub mod export;
pub mod overview;
pub mod refresh;
pub mod search_index;
pub mod summary;
pub mod writer;

use std::path::PathBuf;

pub use documents::{load_documents, TaskDocument};
pub use error::GenerateError;
pub use export::generate_export;
pub use overview::generate_overview;
pub use refresh::refresh_all;
pub use search_index::generate_search_index;
pub use summary::generate_summary;

/// What a generator wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReport {
    pub artifact: &'static str,
    pub path: PathBuf,
    /// Tasks covered by the artifact.
    pub tasks: usize,
}

/// Local "generated at" stamp written into the markdown artifacts.
pub(crate) fn timestamp() -> String {
    chrono::Local::now()
        .format(taskmgr_core::template::DATE_FORMAT)
        .to_string()
}
