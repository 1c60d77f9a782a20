// crates/core/src/tasks.rs
//! Task store operations: create, change status, list.
//!
//! The filesystem is the store. Creating writes a rendered template under a
//! convention filename; a status change is a rename; listing groups by the
//! status segment.

use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::config::TaskConfig;
use crate::discovery::{find_by_id, list_task_filenames};
use crate::error::{DiscoveryError, TaskError};
use crate::naming::{
    id_from_filename, invalid_segment, name_from_filename, rename_status, status_from_filename,
    TaskFileName,
};
use crate::paths::ProjectLayout;
use crate::template::{load_template, render, TemplateVars};

/// Status shown for files without a status segment.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Result of a successful `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub filename: String,
    pub path: PathBuf,
    /// `false` when the status is not among the configured statuses.
    pub status_configured: bool,
}

/// Result of a successful `status` change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub from: String,
    pub to: String,
}

/// One `[STATUS] (n)` block of the task listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusGroup {
    pub status: String,
    pub tasks: Vec<ListedTask>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedTask {
    /// `None` when the filename has no numeric id prefix.
    pub id: Option<String>,
    pub name: String,
    pub filename: String,
}

fn validate_id(id: &str) -> Result<(), TaskError> {
    match invalid_segment(id, false) {
        Some(reason) => Err(TaskError::InvalidId {
            id: id.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn validate_status(status: &str) -> Result<(), TaskError> {
    match invalid_segment(status, false) {
        Some(reason) => Err(TaskError::InvalidStatus {
            status: status.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn validate_name(name: &str) -> Result<(), TaskError> {
    match invalid_segment(name, true) {
        Some(reason) => Err(TaskError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Create `<id>_<name>_<status>.md` from the project template.
///
/// The task directory is created if missing. An existing file is never
/// overwritten.
pub async fn create_task(
    layout: &ProjectLayout,
    config: &TaskConfig,
    id: &str,
    name: &str,
    status: &str,
) -> Result<CreatedTask, TaskError> {
    validate_id(id)?;
    validate_name(name)?;
    validate_status(status)?;

    let status_configured = config.has_status(status);
    if !status_configured {
        warn!(status, configured = ?config.status_keys(), "Status is not configured for this project");
    }

    let task_dir = layout.task_dir();
    fs::create_dir_all(&task_dir)
        .await
        .map_err(|e| TaskError::io(&task_dir, e))?;

    let filename = TaskFileName::new(id, name, status).filename();
    let path = task_dir.join(&filename);
    let content = render(&load_template(layout), &TemplateVars::now(id, name, status));

    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(TaskError::AlreadyExists { filename });
        }
        Err(e) => return Err(TaskError::io(&path, e)),
    };
    file.write_all(content.as_bytes())
        .await
        .map_err(|e| TaskError::io(&path, e))?;
    file.flush().await.map_err(|e| TaskError::io(&path, e))?;

    info!(filename = %filename, "Created task");
    Ok(CreatedTask {
        filename,
        path,
        status_configured,
    })
}

/// Rename the first task file (sorted) for `id` to carry `new_status`.
///
/// Refuses when the target filename already exists, so no document is
/// ever replaced by a rename.
pub async fn change_status(
    layout: &ProjectLayout,
    id: &str,
    new_status: &str,
) -> Result<StatusChange, TaskError> {
    validate_id(id)?;
    validate_status(new_status)?;

    let task_dir = layout.task_dir();
    let filenames = match list_task_filenames(&task_dir).await {
        Ok(names) => names,
        Err(DiscoveryError::TaskDirNotFound { .. }) => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    let from = find_by_id(&filenames, id)
        .ok_or_else(|| TaskError::NotFound { id: id.to_string() })?
        .to_string();
    let to = match TaskFileName::parse(&from) {
        Some(task) => task.with_status(new_status).filename(),
        None => rename_status(&from, new_status),
    };

    if from == to {
        return Ok(StatusChange { from, to });
    }

    let target = task_dir.join(&to);
    if fs::try_exists(&target)
        .await
        .map_err(|e| TaskError::io(&target, e))?
    {
        return Err(TaskError::AlreadyExists { filename: to });
    }

    let source = task_dir.join(&from);
    fs::rename(&source, &target)
        .await
        .map_err(|e| TaskError::io(&source, e))?;

    info!(from = %from, to = %to, "Changed task status");
    Ok(StatusChange { from, to })
}

/// Group task files by status, in order of first appearance.
///
/// A missing task directory lists as empty.
pub async fn list_tasks(
    layout: &ProjectLayout,
    status_filter: Option<&str>,
) -> Result<Vec<StatusGroup>, TaskError> {
    let filenames = match list_task_filenames(&layout.task_dir()).await {
        Ok(names) => names,
        Err(DiscoveryError::TaskDirNotFound { .. }) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    Ok(group_listing(&filenames, status_filter))
}

fn group_listing(filenames: &[String], status_filter: Option<&str>) -> Vec<StatusGroup> {
    let mut groups: Vec<StatusGroup> = Vec::new();
    for filename in filenames {
        let status = match status_from_filename(filename) {
            "" => UNKNOWN_STATUS,
            s => s,
        };
        if status_filter.is_some_and(|f| f != status) {
            continue;
        }

        let id = id_from_filename(filename);
        let task = ListedTask {
            id: (!id.is_empty()).then(|| id.to_string()),
            name: name_from_filename(filename),
            filename: filename.clone(),
        };
        match groups.iter_mut().find(|g| g.status == status) {
            Some(group) => group.tasks.push(task),
            None => groups.push(StatusGroup {
                status: status.to_string(),
                tasks: vec![task],
            }),
        }
    }
    groups
}
