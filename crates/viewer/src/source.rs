// crates/viewer/src/source.rs
//! Where the viewer reads tasks from.
//!
//! The shell only talks to a [`TaskSource`]; [`FsSource`] reads the project
//! directory directly.

use async_trait::async_trait;
use std::path::PathBuf;
use taskmgr_core::{
    list_task_filenames, status_from_filename, try_load_project_config, ConfigError,
    DiscoveryError, ProjectLayout, SearchIndexDocument, TaskConfig,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SourceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                what: path.display().to_string(),
            },
            _ => Self::Io { path, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Discovery(DiscoveryError::TaskDirNotFound { .. })
        )
    }
}

/// Read access to a project's tasks and artifacts.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn load_config(&self) -> Result<TaskConfig, SourceError>;

    /// Sorted filenames whose status segment is `status`.
    async fn list_tasks(&self, status: &str) -> Result<Vec<String>, SourceError>;

    async fn fetch_search_index(&self) -> Result<SearchIndexDocument, SourceError>;

    async fn fetch_document(&self, filename: &str) -> Result<String, SourceError>;
}

/// Reads straight from the project directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    layout: ProjectLayout,
}

impl FsSource {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }
}

/// A bare filename: no separators, no parent references.
pub fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && filename != "."
        && filename != ".."
}

#[async_trait]
impl TaskSource for FsSource {
    async fn load_config(&self) -> Result<TaskConfig, SourceError> {
        Ok(try_load_project_config(self.layout.root())?.unwrap_or_default())
    }

    async fn list_tasks(&self, status: &str) -> Result<Vec<String>, SourceError> {
        let filenames = list_task_filenames(&self.layout.task_dir()).await?;
        Ok(filenames
            .into_iter()
            .filter(|f| status_from_filename(f) == status)
            .collect())
    }

    async fn fetch_search_index(&self) -> Result<SearchIndexDocument, SourceError> {
        let path = self.layout.search_index_path();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::io(&path, e))?;
        serde_json::from_str(&raw).map_err(|e| SourceError::Malformed {
            path,
            message: e.to_string(),
        })
    }

    async fn fetch_document(&self, filename: &str) -> Result<String, SourceError> {
        if !is_plain_filename(filename) {
            return Err(SourceError::NotFound {
                what: filename.to_string(),
            });
        }
        let path = self.layout.task_path(filename);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::io(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source_with(files: &[(&str, &str)]) -> (TempDir, FsSource) {
        let dir = TempDir::new().unwrap();
        let layout = ProjectLayout::new(dir.path());
        std::fs::create_dir_all(layout.task_dir()).unwrap();
        for (name, content) in files {
            std::fs::write(layout.task_path(name), content).unwrap();
        }
        (dir, FsSource::new(layout))
    }

    #[tokio::test]
    async fn test_list_tasks_by_status() {
        let (_dir, source) = source_with(&[
            ("002_b_todo.md", ""),
            ("001_a_todo.md", ""),
            ("003_c_done.md", ""),
        ]);
        assert_eq!(
            source.list_tasks("todo").await.unwrap(),
            vec!["001_a_todo.md", "002_b_todo.md"]
        );
        assert!(source.list_tasks("review").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_document_rejects_traversal() {
        let (_dir, source) = source_with(&[("001_a_todo.md", "body")]);
        assert_eq!(source.fetch_document("001_a_todo.md").await.unwrap(), "body");
        assert!(source.fetch_document("../../etc/passwd").await.unwrap_err().is_not_found());
        assert!(source.fetch_document("missing.md").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_missing_search_index_is_not_found() {
        let (_dir, source) = source_with(&[]);
        assert!(source.fetch_search_index().await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_config_defaults_when_absent() {
        let (_dir, source) = source_with(&[]);
        assert_eq!(source.load_config().await.unwrap(), TaskConfig::default());
    }
}
