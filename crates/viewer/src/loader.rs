// crates/viewer/src/loader.rs
//! Lazy content loading for full-text search.
//!
//! The bulk search index is fetched once per session. After a reload its
//! cached contents are re-adopted without a refetch; records the index does
//! not know about are read one document at a time.

use std::collections::HashMap;
use taskmgr_search::TaskRecordStore;
use tracing::{debug, warn};

use crate::source::TaskSource;

/// How the last [`ContentLoader::ensure_content`] call filled the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub from_index: usize,
    pub from_documents: usize,
    /// Records left with empty content after a failed read.
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct ContentLoader {
    /// filename -> content, from the first successful index fetch.
    index_cache: Option<HashMap<String, String>>,
}

impl ContentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill `content` for every record that lacks it.
    ///
    /// Individual read failures leave that record's content empty; they are
    /// not retried on later calls.
    pub async fn ensure_content(
        &mut self,
        store: &mut TaskRecordStore,
        source: &dyn TaskSource,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        if store.missing_content().is_empty() {
            return report;
        }

        if self.index_cache.is_none() {
            match source.fetch_search_index().await {
                Ok(index) => {
                    debug!(tasks = index.tasks.len(), "Fetched search index");
                    self.index_cache = Some(
                        index
                            .tasks
                            .into_iter()
                            .map(|entry| (entry.filename, entry.content))
                            .collect(),
                    );
                }
                Err(e) => warn!(error = %e, "Search index unavailable, reading documents individually"),
            }
        }

        if let Some(cache) = &self.index_cache {
            for filename in store.missing_content() {
                if let Some(content) = cache.get(&filename) {
                    store.set_content(&filename, content.clone());
                    report.from_index += 1;
                }
            }
        }

        for filename in store.missing_content() {
            match source.fetch_document(&filename).await {
                Ok(content) => {
                    store.set_content(&filename, content);
                    report.from_documents += 1;
                }
                Err(e) => {
                    warn!(filename = %filename, error = %e, "Failed to load task content");
                    store.set_content(&filename, String::new());
                    report.failed += 1;
                }
            }
        }

        debug!(
            from_index = report.from_index,
            from_documents = report.from_documents,
            failed = report.failed,
            "Content load complete"
        );
        report
    }
}
