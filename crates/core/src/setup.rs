// crates/core/src/setup.rs
//! Project initialization (`taskmgr setup`).

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{save_project_config, TaskConfig};
use crate::error::TaskError;
use crate::paths::ProjectLayout;
use crate::template::{DATE_FORMAT, DEFAULT_TEMPLATE};

#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    /// Comma-separated custom statuses (`--statuses`).
    pub statuses: Option<String>,
    /// Re-initialize even when the task directory already exists.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// Task directory already present and `force` was not given.
    AlreadyInitialized,
    Initialized {
        config: TaskConfig,
        written: Vec<PathBuf>,
    },
}

const README: &str = "# Task Management System

File-based task management: one markdown file per task, named
`<id>_<name>_<status>.md`.

## Quick Start

### Create a new task
```bash
taskmgr new 001 my_first_task
```

### View tasks
```bash
taskmgr viewer
```

### Update status
```bash
taskmgr status 001 review
```

### Refresh index
```bash
taskmgr refresh
```
";

/// Create the directory layout, template, config and starter documents.
///
/// Generated artifacts (`INDEX.md`) are left to the caller.
pub fn setup_project(layout: &ProjectLayout, options: &SetupOptions) -> Result<SetupOutcome, TaskError> {
    let task_dir = layout.task_dir();
    if task_dir.exists() && !options.force {
        debug!(dir = %task_dir.display(), "Task directory exists, skipping setup");
        return Ok(SetupOutcome::AlreadyInitialized);
    }

    for dir in [task_dir, layout.claude_dir()] {
        std::fs::create_dir_all(&dir).map_err(|e| TaskError::io(&dir, e))?;
    }

    let config = match options.statuses.as_deref() {
        Some(list) => TaskConfig::from_statuses(list),
        None => TaskConfig::default(),
    };
    save_project_config(&config, layout.root())?;

    let [template_path, _] = layout.template_candidates();
    let now = chrono::Local::now();
    let state = state_document(
        &config,
        &now.format("%Y-%m-%d").to_string(),
        &now.format(DATE_FORMAT).to_string(),
    );
    let files = [
        (template_path, DEFAULT_TEMPLATE.to_string()),
        (layout.state_path(), state),
        (layout.readme_path(), README.to_string()),
    ];

    let mut written = vec![layout.config_path()];
    for (path, content) in files {
        write_file(&path, &content)?;
        written.push(path);
    }

    info!(root = %layout.root().display(), statuses = ?config.status_keys(), "Project initialized");
    Ok(SetupOutcome::Initialized { config, written })
}

fn write_file(path: &Path, content: &str) -> Result<(), TaskError> {
    std::fs::write(path, content).map_err(|e| TaskError::io(path, e))
}

/// `STATE_current.md`: one empty section per configured status.
fn state_document(config: &TaskConfig, day: &str, stamp: &str) -> String {
    let mut out = format!("# 現在の作業状態 - {day}\n");
    for status in &config.statuses {
        out.push_str(&format!("\n## {}\n", status.label));
    }
    out.push_str(&format!("\n---\n最終更新: {stamp}\n"));
    out
}
