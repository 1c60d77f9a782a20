// crates/viewer/src/markdown.rs
//! The small markdown subset the task modal understands.
//!
//! Input is escaped before any conversion, so document text can only ever
//! produce the tags introduced here.

use regex_lite::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;
use taskmgr_core::TaskRecord;
use taskmgr_search::escape_html;

use crate::source::{SourceError, TaskSource};

struct Rules {
    h3: Regex,
    h2: Regex,
    h1: Regex,
    checked: Regex,
    unchecked: Regex,
    bullet: Regex,
    fence: Regex,
    inline_code: Regex,
    bold: Regex,
}

fn rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| Rules {
        h3: Regex::new(r"(?m)^### (.*)$").expect("valid h3 regex"),
        h2: Regex::new(r"(?m)^## (.*)$").expect("valid h2 regex"),
        h1: Regex::new(r"(?m)^# (.*)$").expect("valid h1 regex"),
        checked: Regex::new(r"(?m)^- \[x\] (.*)$").expect("valid checked item regex"),
        unchecked: Regex::new(r"(?m)^- \[ \] (.*)$").expect("valid unchecked item regex"),
        bullet: Regex::new(r"(?m)^- (.*)$").expect("valid bullet regex"),
        fence: Regex::new(r"```(.*?)\n((?s:.*?))```").expect("valid code fence regex"),
        inline_code: Regex::new(r"`([^`]+)`").expect("valid inline code regex"),
        bold: Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"),
    })
}

/// Convert task markdown to HTML for the modal body.
pub fn render_markdown(content: &str) -> String {
    let escaped = escape_html(content);
    let rules = rules();

    let html = rules.h3.replace_all(&escaped, "<h3>$1</h3>");
    let html = rules.h2.replace_all(&html, "<h2>$1</h2>");
    let html = rules.h1.replace_all(&html, "<h1>$1</h1>");
    let html = rules.checked.replace_all(&html, "✅ $1<br>");
    let html = rules.unchecked.replace_all(&html, "☐ $1<br>");
    let html = rules.bullet.replace_all(&html, "• $1<br>");
    let html = rules.fence.replace_all(&html, |caps: &Captures| {
        format!(
            r#"<pre><code class="{}">{}</code></pre>"#,
            &caps[1], &caps[2]
        )
    });
    let html = rules.inline_code.replace_all(&html, "<code>$1</code>");
    let html = rules.bold.replace_all(&html, "<strong>$1</strong>");
    html.replace('\n', "<br>")
}

/// What the modal shows for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskModal {
    pub filename: String,
    /// `#<id> - <name>`, escaped.
    pub title_html: String,
    pub body_html: String,
}

impl TaskModal {
    pub fn new(filename: &str, content: &str) -> Self {
        let record = TaskRecord::from_filename(filename);
        let id = if record.id.is_empty() { "---" } else { &record.id };
        Self {
            filename: filename.to_string(),
            title_html: escape_html(&format!("#{id} - {}", record.title)),
            body_html: render_markdown(content),
        }
    }
}

/// Read one task document and render it for the modal.
pub async fn open_task(source: &dyn TaskSource, filename: &str) -> Result<TaskModal, SourceError> {
    let content = source.fetch_document(filename).await?;
    Ok(TaskModal::new(filename, &content))
}
