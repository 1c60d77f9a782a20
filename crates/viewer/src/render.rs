// crates/viewer/src/render.rs
//! Board snapshots: what the page draws.

use serde::Serialize;
use taskmgr_core::{StatusConfig, TaskConfig};
use taskmgr_search::{CardView, SearchOutcome};

/// Icon for columns without a known status.
pub const DEFAULT_ICON: &str = "📋";
pub const EMPTY_PLACEHOLDER: &str = "No tasks";
pub const FAILED_PLACEHOLDER: &str = "Failed to load";

pub fn status_icon(key: &str) -> &'static str {
    match key.to_lowercase().as_str() {
        "backlog" => "📋",
        "todo" => "🔵",
        "review" => "🔴",
        "done" => "✅",
        "idea" => "💡",
        "doing" => "🔨",
        "testing" => "🧪",
        "planning" => "🗓️",
        _ => DEFAULT_ICON,
    }
}

/// Border colors for every status that has one.
pub fn dynamic_css(statuses: &[StatusConfig]) -> String {
    statuses
        .iter()
        .filter(|s| !s.color.is_empty() && is_css_token(&s.key) && is_css_color(&s.color))
        .map(|s| {
            format!(
                ".task-card.{key} {{ border-left: 3px solid {color}; }}\n\
                 .column-header.{key} {{ border-bottom-color: {color}; }}\n",
                key = s.key,
                color = s.color
            )
        })
        .collect()
}

/// Status keys become class names; anything else would break the stylesheet.
fn is_css_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn is_css_color(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || "#(),.% ".contains(c))
}

/// Listing result for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnLoad {
    Loaded(Vec<String>),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub key: String,
    pub label: String,
    pub color: String,
    pub icon: &'static str,
    pub count: usize,
    pub cards: Vec<CardView>,
    /// Shown instead of cards when the column is empty or failed to list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub query: String,
    pub full_text: bool,
    pub visible_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub columns: Vec<ColumnView>,
    pub total: usize,
    pub search: SearchSummary,
    pub css: String,
    /// Local `HH:MM` of the last reload.
    pub updated_at: String,
    /// Increments on every snapshot the shell publishes.
    pub revision: u64,
}

impl BoardSnapshot {
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            total: 0,
            search: SearchSummary {
                query: String::new(),
                full_text: false,
                visible_count: 0,
                message: None,
            },
            css: String::new(),
            updated_at: String::new(),
            revision: 0,
        }
    }

    pub fn column(&self, key: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.key == key)
    }
}

/// Lay the search outcome out in configured column order.
pub fn render_board(
    config: &TaskConfig,
    columns: &[(String, ColumnLoad)],
    outcome: &SearchOutcome,
    updated_at: &str,
    revision: u64,
) -> BoardSnapshot {
    let mut total = 0;
    let views = config
        .statuses
        .iter()
        .map(|status| {
            let load = columns
                .iter()
                .find(|(key, _)| key == &status.key)
                .map(|(_, load)| load);
            let (cards, placeholder) = match load {
                Some(ColumnLoad::Loaded(files)) if !files.is_empty() => {
                    let cards: Vec<CardView> = files
                        .iter()
                        .filter_map(|f| outcome.card(f).cloned())
                        .collect();
                    (cards, None)
                }
                Some(ColumnLoad::Failed) => (Vec::new(), Some(FAILED_PLACEHOLDER)),
                _ => (Vec::new(), Some(EMPTY_PLACEHOLDER)),
            };
            total += cards.len();
            ColumnView {
                key: status.key.clone(),
                label: status.label.clone(),
                color: status.color.clone(),
                icon: status_icon(&status.key),
                count: cards.len(),
                cards,
                placeholder,
            }
        })
        .collect();

    BoardSnapshot {
        columns: views,
        total,
        search: SearchSummary {
            query: outcome.query.clone(),
            full_text: outcome.full_text,
            visible_count: outcome.visible_count,
            message: outcome.message.clone(),
        },
        css: dynamic_css(&config.statuses),
        updated_at: updated_at.to_string(),
        revision,
    }
}
