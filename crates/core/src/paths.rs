// crates/core/src/paths.rs
//! Centralized path functions for every project storage location.
//!
//! All task data lives under the project root: documents in
//! `docs/logs/tasks/`, generated artifacts next to them in `docs/logs/`.

use std::path::{Path, PathBuf};

/// Project configuration file, relative to the root.
pub const CONFIG_FILE: &str = ".taskconfig.json";

pub const INDEX_FILE: &str = "INDEX.md";
pub const SUMMARY_FILE: &str = "TASK_SUMMARY.md";
pub const EXPORT_FILE: &str = "tasks.json";
pub const SEARCH_INDEX_FILE: &str = "tasks_search.json";
pub const RELATIONS_FILE: &str = "relations.json";
pub const TEMPLATE_FILE: &str = "task-template.md";

/// Resolved locations for one project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `docs/logs/`: home of the generated artifacts.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("docs").join("logs")
    }

    /// `docs/logs/tasks/`: one markdown file per task.
    pub fn task_dir(&self) -> PathBuf {
        self.logs_dir().join("tasks")
    }

    pub fn task_path(&self, filename: &str) -> PathBuf {
        self.task_dir().join(filename)
    }

    pub fn index_path(&self) -> PathBuf {
        self.logs_dir().join(INDEX_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.logs_dir().join(SUMMARY_FILE)
    }

    pub fn export_path(&self) -> PathBuf {
        self.logs_dir().join(EXPORT_FILE)
    }

    pub fn search_index_path(&self) -> PathBuf {
        self.logs_dir().join(SEARCH_INDEX_FILE)
    }

    /// Optional `[["from", "to"], ...]` dependency edges.
    pub fn relations_path(&self) -> PathBuf {
        self.logs_dir().join(RELATIONS_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn claude_dir(&self) -> PathBuf {
        self.root.join(".claude")
    }

    /// Template lookup order for `new`: project `.claude/` first, then `templates/`.
    pub fn template_candidates(&self) -> [PathBuf; 2] {
        [
            self.claude_dir().join(TEMPLATE_FILE),
            self.root.join("templates").join(TEMPLATE_FILE),
        ]
    }

    pub fn state_path(&self) -> PathBuf {
        self.logs_dir().join("STATE_current.md")
    }

    pub fn readme_path(&self) -> PathBuf {
        self.logs_dir().join("README.md")
    }
}
