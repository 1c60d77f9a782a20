// crates/core/src/naming.rs
//! The task naming convention: `<id>_<name>_<status>.md`.
//!
//! The filename is the only place a task's status is stored, so renaming the
//! file *is* the status change. Everything above the storage boundary works
//! with [`TaskFileName`], which keeps the stable `id` apart from the mutable
//! `status` and derives the filename on demand.

use serde::{Deserialize, Serialize};

/// Extension shared by every task document.
pub const TASK_EXTENSION: &str = ".md";

/// A parsed task filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskFileName {
    pub id: String,
    pub name: String,
    pub status: String,
}

impl TaskFileName {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: status.into(),
        }
    }

    /// Parse a filename that follows the full convention.
    ///
    /// Returns `None` when the id prefix, the name, or the status suffix is
    /// missing. Use the free functions below for the lenient per-field rules.
    pub fn parse(filename: &str) -> Option<Self> {
        let stem = filename.strip_suffix(TASK_EXTENSION)?;
        let id = id_from_filename(filename);
        if id.is_empty() {
            return None;
        }
        let rest = &stem[id.len() + 1..];
        let (name, status) = rest.rsplit_once('_')?;
        if name.is_empty() || status.is_empty() {
            return None;
        }
        Some(Self::new(id, name, status))
    }

    /// The on-disk filename for this task.
    pub fn filename(&self) -> String {
        format!("{}_{}_{}{}", self.id, self.name, self.status, TASK_EXTENSION)
    }

    /// Same task, different status. Only the derived filename changes.
    pub fn with_status(&self, status: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            status: status.into(),
        }
    }
}

/// Leading run of ASCII digits terminated by the first underscore, or `""`.
pub fn id_from_filename(filename: &str) -> &str {
    let digits = filename
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits > 0 && filename.as_bytes().get(digits) == Some(&b'_') {
        &filename[..digits]
    } else {
        ""
    }
}

/// Trailing `_<token>.md` segment, or `""` when the filename has none.
pub fn status_from_filename(filename: &str) -> &str {
    let Some(stem) = filename.strip_suffix(TASK_EXTENSION) else {
        return "";
    };
    match stem.rfind('_') {
        Some(idx) => &stem[idx + 1..],
        None => "",
    }
}

/// Middle `name` segment: the filename without its id prefix and status suffix.
pub fn name_from_filename(filename: &str) -> String {
    let id = id_from_filename(filename);
    let without_id = if id.is_empty() {
        filename
    } else {
        &filename[id.len() + 1..]
    };
    let status = status_from_filename(without_id);
    if status.is_empty() {
        return without_id.to_string();
    }
    let cut = without_id.len() - status.len() - 1 - TASK_EXTENSION.len();
    without_id[..cut].to_string()
}

/// Title shown when a document has no heading: the name with spaces.
pub fn title_from_filename(filename: &str) -> String {
    name_from_filename(filename).replace('_', " ")
}

/// Replace the status segment of `filename`.
///
/// Everything after the last underscore is swapped for `<status>.md`; a
/// filename without underscores becomes just `<status>.md`.
pub fn rename_status(filename: &str, status: &str) -> String {
    match filename.rfind('_') {
        Some(idx) => format!("{}_{}{}", &filename[..idx], status, TASK_EXTENSION),
        None => format!("{}{}", status, TASK_EXTENSION),
    }
}

/// Reason a filename component is not usable, or `None` when it is.
///
/// Underscores would shift the status segment and path separators would
/// escape the task directory.
pub fn invalid_segment(segment: &str, allow_underscore: bool) -> Option<&'static str> {
    if segment.is_empty() {
        return Some("must not be empty");
    }
    if segment.contains(['/', '\\']) || segment == "." || segment == ".." {
        return Some("must not contain path separators");
    }
    if !allow_underscore && segment.contains('_') {
        return Some("must not contain underscores");
    }
    None
}
