// crates/search/src/history.rs
//! Search history: the most recent submitted queries, persisted.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Number of queries kept.
pub const HISTORY_CAPACITY: usize = 5;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error accessing search history {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed search history {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl HistoryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Most-recent-first list of distinct submitted queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn from_entries(entries: Vec<String>) -> Self {
        let mut history = Self::default();
        for entry in entries.into_iter().rev() {
            history.submit(&entry);
        }
        history
    }

    /// Record a submitted query. Blank queries are ignored.
    ///
    /// An existing equal entry moves to the front instead of repeating.
    pub fn submit(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        self.entries.retain(|q| q != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(HISTORY_CAPACITY);
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// Where history survives between sessions.
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Result<Vec<String>, HistoryError>;
    fn save(&self, entries: &[String]) -> Result<(), HistoryError>;
}

/// JSON array in a file.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/taskmgr/search_history.json`, or `None` without a data dir.
    pub fn default_location() -> Option<Self> {
        dirs::data_local_dir().map(|d| Self::new(d.join("taskmgr").join("search_history.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<Vec<String>, HistoryError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HistoryError::io(&self.path, e)),
        };
        serde_json::from_str(&raw).map_err(|e| HistoryError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn save(&self, entries: &[String]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HistoryError::io(parent, e))?;
        }
        let json = serde_json::to_string(entries).map_err(|e| HistoryError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, json).map_err(|e| HistoryError::io(&self.path, e))
    }
}

/// Non-persistent store for tests and for hosts without a data dir.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<Vec<String>>,
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<String>, HistoryError> {
        Ok(self.entries.lock().map(|e| e.clone()).unwrap_or_default())
    }

    fn save(&self, entries: &[String]) -> Result<(), HistoryError> {
        if let Ok(mut stored) = self.entries.lock() {
            *stored = entries.to_vec();
        }
        Ok(())
    }
}

/// Load history, starting empty when the store cannot be read.
pub fn load_history(store: &dyn HistoryStore) -> SearchHistory {
    match store.load() {
        Ok(entries) => {
            debug!(count = entries.len(), "Loaded search history");
            SearchHistory::from_entries(entries)
        }
        Err(e) => {
            warn!(error = %e, "Failed to load search history, starting empty");
            SearchHistory::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_submit_order_dedup_and_capacity() {
        let mut history = SearchHistory::default();
        for q in ["a", "b", "a", "c", "d", "e"] {
            history.submit(q);
        }
        assert_eq!(history.entries(), ["e", "d", "c", "a", "b"]);

        history.submit("f");
        assert_eq!(history.entries(), ["f", "e", "d", "c", "a"]);
    }

    #[test]
    fn test_blank_queries_are_ignored() {
        let mut history = SearchHistory::default();
        assert!(!history.submit("   "));
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_from_entries_preserves_order() {
        let history = SearchHistory::from_entries(vec!["x".into(), "y".into(), "x".into()]);
        assert_eq!(history.entries(), ["x", "y"]);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileHistoryStore::new(dir.path().join("nested/history.json"));
        assert!(store.load().unwrap().is_empty());

        store.save(&["b".to_string(), "a".to_string()]).unwrap();
        assert_eq!(load_history(&store).entries(), ["b", "a"]);
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileHistoryStore::new(&path);
        assert!(matches!(store.load(), Err(HistoryError::Malformed { .. })));
        assert!(load_history(&store).entries().is_empty());
    }
}
