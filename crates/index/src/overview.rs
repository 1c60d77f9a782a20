// crates/index/src/overview.rs
//! `INDEX.md`: per-status counts and link lists.
//!
//! Works from filenames alone; document text is never read.

use std::fmt::Write as _;
use taskmgr_core::{list_task_filenames, status_from_filename, ProjectLayout, TaskConfig};
use tracing::info;

use crate::error::GenerateError;
use crate::writer::write_atomic;
use crate::ArtifactReport;

pub fn render_overview(config: &TaskConfig, filenames: &[String], generated_at: &str) -> String {
    let groups: Vec<(&str, Vec<&str>)> = config
        .statuses
        .iter()
        .map(|status| {
            let mut files: Vec<&str> = filenames
                .iter()
                .map(String::as_str)
                .filter(|f| status_from_filename(f) == status.key)
                .collect();
            files.sort_unstable();
            (status.label.as_str(), files)
        })
        .collect();

    let mut out = format!("# タスク一覧\n*自動生成: {generated_at}*\n\n## 📊 サマリー\n");
    for (label, files) in &groups {
        let _ = writeln!(out, "- {label}: {}件", files.len());
    }
    out.push('\n');

    for (label, files) in groups.iter().filter(|(_, files)| !files.is_empty()) {
        let _ = writeln!(out, "\n## {label}");
        for file in files {
            let _ = writeln!(out, "- [{file}](./tasks/{file})");
        }
    }
    out
}

/// Regenerate `docs/logs/INDEX.md`.
pub async fn generate_overview(
    layout: &ProjectLayout,
    config: &TaskConfig,
) -> Result<ArtifactReport, GenerateError> {
    let filenames = list_task_filenames(&layout.task_dir()).await?;
    let content = render_overview(config, &filenames, &crate::timestamp());
    let path = layout.index_path();
    write_atomic(&path, content).await?;

    info!(path = %path.display(), tasks = filenames.len(), "Generated overview index");
    Ok(ArtifactReport {
        artifact: "INDEX.md",
        path,
        tasks: filenames.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_overview() {
        let names: Vec<String> = ["002_b_todo.md", "001_a_todo.md", "003_c_done.md", "004_d_doing.md"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let out = render_overview(&TaskConfig::default(), &names, "2024/01/01 00:00:00");
        let expected = "# タスク一覧
*自動生成: 2024/01/01 00:00:00*

## 📊 サマリー
- BACKLOG: 0件
- TODO: 2件
- REVIEW: 0件
- DONE: 1件


## TODO
- [001_a_todo.md](./tasks/001_a_todo.md)
- [002_b_todo.md](./tasks/002_b_todo.md)

## DONE
- [003_c_done.md](./tasks/003_c_done.md)
";
        assert_eq!(out, expected);
    }
}
