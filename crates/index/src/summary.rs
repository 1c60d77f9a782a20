// crates/index/src/summary.rs
//! `TASK_SUMMARY.md`: the human-readable digest.
//!
//! Sections, in order: todo blocks, backlog by phase, the dependency graph
//! as a mermaid `graph LR`, and a link list of every task.

use std::fmt::Write as _;
use std::path::Path;
use taskmgr_core::{extract_dependencies, ProjectLayout, TaskRecord};
use tracing::{info, warn};

use crate::documents::{load_documents, TaskDocument};
use crate::error::GenerateError;
use crate::writer::write_atomic;
use crate::ArtifactReport;

/// Backlog phase groups, in output order. Anything else lands in "other".
const BACKLOG_PHASES: [&str; 5] = ["1", "2", "3", "4", "5"];

/// A prerequisite edge: `from` must be done before `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// 🔴 for high, 🟠 for medium, 🟢 for everything else.
pub fn priority_emoji(priority: &str) -> &'static str {
    if priority.contains('高') {
        "🔴"
    } else if priority.contains('中') {
        "🟠"
    } else {
        "🟢"
    }
}

/// Edges from `relations.json`. A missing file means no edges.
///
/// # Errors
/// Fails on read errors other than not-found. Malformed JSON is logged and
/// treated as empty.
pub async fn load_relations(path: &Path) -> Result<Vec<Edge>, GenerateError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(GenerateError::read(path, e)),
    };
    match serde_json::from_str::<Vec<(String, String)>>(&raw) {
        Ok(pairs) => Ok(pairs.into_iter().map(|(from, to)| Edge::new(from, to)).collect()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed relations file");
            Ok(Vec::new())
        }
    }
}

/// Relations-file edges followed by edges declared in documents, deduplicated.
///
/// A document that lists `003` under its dependencies contributes
/// `003 --> <its own id>`.
pub fn collect_edges(relations: Vec<Edge>, docs: &[TaskDocument]) -> Vec<Edge> {
    let declared = docs.iter().flat_map(|doc| {
        extract_dependencies(&doc.content)
            .into_iter()
            .map(|dep| Edge::new(dep, doc.record.id.clone()))
    });

    let mut edges: Vec<Edge> = Vec::new();
    for edge in relations.into_iter().chain(declared) {
        if !edges.contains(&edge) {
            edges.push(edge);
        }
    }
    edges
}

/// `None` is the catch-all group for phases outside 1..5.
fn in_phase(task: &TaskRecord, phase: Option<&str>) -> bool {
    match phase {
        Some(p) => task.phase == p,
        None => !BACKLOG_PHASES.contains(&task.phase.as_str()),
    }
}

pub fn render_summary(records: &[TaskRecord], edges: &[Edge], generated_at: &str) -> String {
    let mut out = format!(
        "# 📝 タスクサマリー\n\n*生成日時: {generated_at}*\n\n## 🎯 クイックリファレンス\n\n"
    );

    let todo: Vec<&TaskRecord> = records.iter().filter(|r| r.status == "todo").collect();
    if !todo.is_empty() {
        out.push_str("\n### 🟢 TODO\n\n");
        for task in todo {
            let _ = writeln!(out, "#### {}: {}", task.id, task.title);
            let _ = writeln!(out, "- **優先度**: {}", task.priority);
            if !task.phase.is_empty() {
                let _ = writeln!(out, "- **フェーズ**: {}", task.phase);
            }
            let _ = writeln!(out, "- **概要**: {}", task.background);
            if !task.features.is_empty() {
                out.push_str("- **主な機能**:\n");
                for feature in &task.features {
                    let _ = writeln!(out, "  - {feature}");
                }
            }
            out.push('\n');
        }
    }

    let backlog: Vec<&TaskRecord> = records.iter().filter(|r| r.status == "backlog").collect();
    if !backlog.is_empty() {
        out.push_str("\n### 🟡 BACKLOG\n\n");
        let groups = BACKLOG_PHASES.iter().map(|p| Some(*p)).chain([None]);
        for phase in groups {
            let tasks: Vec<&TaskRecord> = backlog
                .iter()
                .copied()
                .filter(|t| in_phase(t, phase))
                .collect();
            if tasks.is_empty() {
                continue;
            }
            match phase {
                Some(p) => {
                    let _ = write!(out, "\n#### フェーズ{p}\n\n");
                }
                None => out.push_str("\n#### フェーズ: その他\n\n"),
            }
            for task in tasks {
                let _ = writeln!(
                    out,
                    "- **{}: {}** {}",
                    task.id,
                    task.title,
                    priority_emoji(&task.priority)
                );
                let _ = writeln!(out, "  - {}", task.background);
            }
        }
    }

    out.push_str("\n## 🔗 タスク相関図\n\n```mermaid\ngraph LR\n");
    let find = |id: &str| records.iter().find(|r| r.id == id);
    for edge in edges {
        if let (Some(from), Some(to)) = (find(edge.from.as_str()), find(edge.to.as_str())) {
            let _ = writeln!(
                out,
                "    {}[{}] --> {}[{}]",
                edge.from, from.title, edge.to, to.title
            );
        }
    }
    out.push_str("```\n\n## 🔍 タスク詳細\n\n");

    for task in records {
        let _ = writeln!(out, "- [{}: {}](./tasks/{})", task.id, task.title, task.filename);
    }
    out
}

/// Regenerate `docs/logs/TASK_SUMMARY.md`.
pub async fn generate_summary(layout: &ProjectLayout) -> Result<ArtifactReport, GenerateError> {
    let docs = load_documents(&layout.task_dir()).await?;
    let edges = collect_edges(load_relations(&layout.relations_path()).await?, &docs);
    let records: Vec<TaskRecord> = docs.into_iter().map(|d| d.record).collect();

    let content = render_summary(&records, &edges, &crate::timestamp());
    let path = layout.summary_path();
    write_atomic(&path, content).await?;

    info!(path = %path.display(), tasks = records.len(), edges = edges.len(), "Generated task summary");
    Ok(ArtifactReport {
        artifact: "TASK_SUMMARY.md",
        path,
        tasks: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: &str, status: &str, title: &str) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            title: title.to_string(),
            status: status.to_string(),
            filename: format!("{id}_{}_{status}.md", title.replace(' ', "_")),
            ..TaskRecord::default()
        }
    }

    #[test]
    fn test_priority_emoji() {
        assert_eq!(priority_emoji("高 (フェーズ1)"), "🔴");
        assert_eq!(priority_emoji("中"), "🟠");
        assert_eq!(priority_emoji("低"), "🟢");
        assert_eq!(priority_emoji(""), "🟢");
    }

    #[test]
    fn test_render_todo_block() {
        let mut task = record("001", "todo", "auth");
        task.priority = "高 (フェーズ1)".to_string();
        task.phase = "1".to_string();
        task.background = "login is broken".to_string();
        task.features = vec!["oauth".to_string(), "sessions".to_string()];

        let out = render_summary(&[task], &[], "now");
        assert!(out.contains(
            "### 🟢 TODO\n\n#### 001: auth\n- **優先度**: 高 (フェーズ1)\n- **フェーズ**: 1\n- **概要**: login is broken\n- **主な機能**:\n  - oauth\n  - sessions\n\n"
        ));
    }

    #[test]
    fn test_backlog_phase_grouping() {
        let mut a = record("001", "backlog", "a");
        a.phase = "2".to_string();
        a.priority = "中".to_string();
        let mut b = record("002", "backlog", "b");
        b.phase = "7".to_string();
        let c = record("003", "backlog", "c");

        let out = render_summary(&[a, b, c], &[], "now");
        let phase2 = out.find("#### フェーズ2").unwrap();
        let other = out.find("#### フェーズ: その他").unwrap();
        assert!(phase2 < other);
        assert!(out.contains("- **001: a** 🟠\n"));
        assert!(out.contains("- **002: b** 🟢\n"));
        assert!(out.contains("- **003: c** 🟢\n"));
        assert!(!out.contains("#### フェーズ7"));
    }

    #[test]
    fn test_graph_only_renders_edges_between_known_tasks() {
        let records = vec![record("001", "done", "setup"), record("003", "todo", "login")];
        let edges = vec![Edge::new("001", "003"), Edge::new("001", "099")];
        let out = render_summary(&records, &edges, "now");
        assert!(out.contains("```mermaid\ngraph LR\n    001[setup] --> 003[login]\n```\n"));
        assert!(!out.contains("099"));
    }

    #[test]
    fn test_link_list_is_last() {
        let records = vec![record("001", "done", "setup")];
        let out = render_summary(&records, &[], "now");
        assert!(out.ends_with("## 🔍 タスク詳細\n\n- [001: setup](./tasks/001_setup_done.md)\n"));
    }

    #[tokio::test]
    async fn test_load_relations() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("relations.json");
        assert!(load_relations(&path).await.unwrap().is_empty());

        std::fs::write(&path, r#"[["001", "002"]]"#).unwrap();
        assert_eq!(load_relations(&path).await.unwrap(), vec![Edge::new("001", "002")]);

        std::fs::write(&path, "{not json").unwrap();
        assert!(load_relations(&path).await.unwrap().is_empty());
    }

    #[test]
    fn test_collect_edges_merges_relations_and_documents() {
        let content = "### 依存するタスク\n- 001\n- 002\n".to_string();
        let doc = TaskDocument {
            file: taskmgr_core::TaskFile {
                filename: "003_x_todo.md".to_string(),
                path: "003_x_todo.md".into(),
                modified_ms: 0,
            },
            record: taskmgr_core::extract_task(&content, "003_x_todo.md"),
            content,
        };
        let edges = collect_edges(vec![Edge::new("001", "003"), Edge::new("005", "006")], &[doc]);
        assert_eq!(
            edges,
            vec![Edge::new("001", "003"), Edge::new("005", "006"), Edge::new("002", "003")]
        );
    }
}
