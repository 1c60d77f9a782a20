// crates/core/src/template.rs
//! Task document templates.

use std::path::Path;
use tracing::{debug, warn};

use crate::paths::ProjectLayout;

/// Template used when the project has none of its own.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/task-template.md");

/// Timestamp format substituted for `__DATE__`.
pub const DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Values substituted into a template.
#[derive(Debug, Clone)]
pub struct TemplateVars<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub status: &'a str,
    pub date: String,
}

impl<'a> TemplateVars<'a> {
    /// Vars stamped with the current local time.
    pub fn now(id: &'a str, name: &'a str, status: &'a str) -> Self {
        Self {
            id,
            name,
            status,
            date: chrono::Local::now().format(DATE_FORMAT).to_string(),
        }
    }
}

/// Replace every `__ID__`, `__NAME__`, `__STATUS__` and `__DATE__`.
///
/// The status is written uppercased.
pub fn render(template: &str, vars: &TemplateVars<'_>) -> String {
    template
        .replace("__ID__", vars.id)
        .replace("__NAME__", vars.name)
        .replace("__STATUS__", &vars.status.to_uppercase())
        .replace("__DATE__", &vars.date)
}

/// Load the first project template that can be read, else the built-in one.
pub fn load_template(layout: &ProjectLayout) -> String {
    for candidate in layout.template_candidates() {
        match read_if_present(&candidate) {
            Ok(Some(text)) => {
                debug!(path = %candidate.display(), "Using project template");
                return text;
            }
            Ok(None) => {}
            Err(e) => warn!(path = %candidate.display(), error = %e, "Unreadable template, skipping"),
        }
    }
    DEFAULT_TEMPLATE.to_string()
}

fn read_if_present(path: &Path) -> std::io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
