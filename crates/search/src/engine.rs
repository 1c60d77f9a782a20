// crates/search/src/engine.rs
//! The search pass over a [`TaskRecordStore`].
//!
//! A pass is a pure function of the store, the normalized query and the
//! full-text toggle. It never mutates records; the caller renders the
//! returned [`SearchOutcome`].

use serde::Serialize;
use taskmgr_core::TaskRecord;

use crate::highlight::{content_preview, escape_html, fold_case, highlight};
use crate::store::TaskRecordStore;

/// Shown in place of a missing id.
const NO_ID: &str = "---";

/// Case-fold and trim raw input.
pub fn normalize_query(raw: &str) -> String {
    fold_case(raw.trim())
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    fold_case(haystack).contains(needle_lower)
}

/// Whether `record` is visible for the normalized query `q`.
///
/// Content only counts when full-text mode is on and the content has been
/// loaded.
pub fn matches(record: &TaskRecord, q: &str, full_text: bool) -> bool {
    if q.is_empty() {
        return true;
    }
    contains_ci(&record.id, q)
        || contains_ci(&record.title, q)
        || contains_ci(&record.status, q)
        || (full_text && record.content.as_deref().is_some_and(|c| contains_ci(c, q)))
}

/// One rendered card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub filename: String,
    pub status: String,
    /// `#<id>`, escaped, with matches marked.
    pub id_html: String,
    pub title_html: String,
    pub visible: bool,
    /// Full-text excerpt, present only when the content matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub full_text: bool,
    pub cards: Vec<CardView>,
    pub visible_count: usize,
    /// Result line; `None` while no query is active.
    pub message: Option<String>,
}

impl SearchOutcome {
    pub fn card(&self, filename: &str) -> Option<&CardView> {
        self.cards.iter().find(|c| c.filename == filename)
    }
}

/// Plain, unhighlighted card.
pub fn plain_card(record: &TaskRecord) -> CardView {
    let id = if record.id.is_empty() { NO_ID } else { &record.id };
    CardView {
        filename: record.filename.clone(),
        status: record.status.clone(),
        id_html: format!("#{}", escape_html(id)),
        title_html: escape_html(&record.title),
        visible: true,
        preview_html: None,
    }
}

fn search_card(record: &TaskRecord, q: &str, full_text: bool) -> CardView {
    let mut card = plain_card(record);
    if !matches(record, q, full_text) {
        card.visible = false;
        return card;
    }

    if contains_ci(&record.id, q) {
        card.id_html = format!("#{}", highlight(&record.id, q));
    }
    if contains_ci(&record.title, q) {
        card.title_html = highlight(&record.title, q);
    }
    if full_text {
        card.preview_html = record
            .content
            .as_deref()
            .and_then(|content| content_preview(content, q));
    }
    card
}

/// Result line for `visible` matches.
pub fn result_message(visible: usize, full_text: bool) -> String {
    match (visible, full_text) {
        (0, _) => "No matching tasks".to_string(),
        (1, false) => "1 task found".to_string(),
        (1, true) => "1 task found (full text)".to_string(),
        (n, false) => format!("{n} tasks found"),
        (n, true) => format!("{n} tasks found (full text)"),
    }
}

/// Run one search pass. `q` must already be normalized.
///
/// An empty query restores every card to visible and unhighlighted.
pub fn run_search(store: &TaskRecordStore, q: &str, full_text: bool) -> SearchOutcome {
    if q.is_empty() {
        let cards: Vec<CardView> = store.records().iter().map(plain_card).collect();
        return SearchOutcome {
            query: String::new(),
            full_text,
            visible_count: cards.len(),
            cards,
            message: None,
        };
    }

    let cards: Vec<CardView> = store
        .records()
        .iter()
        .map(|r| search_card(r, q, full_text))
        .collect();
    let visible_count = cards.iter().filter(|c| c.visible).count();
    SearchOutcome {
        query: q.to_string(),
        full_text,
        message: Some(result_message(visible_count, full_text)),
        cards,
        visible_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> TaskRecordStore {
        let mut store = TaskRecordStore::from_filenames([
            "001_implement_auth_todo.md",
            "002_write_docs_review.md",
            "013_fix_login_bug_done.md",
        ]);
        store.set_content(
            "002_write_docs_review.md",
            "Document the OAuth flow.\n<script>alert('x')</script>".to_string(),
        );
        store
    }

    fn visible(outcome: &SearchOutcome) -> Vec<&str> {
        outcome
            .cards
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.filename.as_str())
            .collect()
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  AuTh \n"), "auth");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_visible_subset_is_exactly_the_matching_records() {
        let store = store();
        for q in ["auth", "01", "review", "zzz", "o"] {
            let outcome = run_search(&store, q, false);
            let expected: Vec<&str> = store
                .records()
                .iter()
                .filter(|r| matches(r, q, false))
                .map(|r| r.filename.as_str())
                .collect();
            assert_eq!(visible(&outcome), expected, "query {q}");
            assert_eq!(outcome.visible_count, expected.len());
        }
    }

    #[test]
    fn test_id_title_status_matching() {
        let store = store();
        assert_eq!(visible(&run_search(&store, "013", false)), vec!["013_fix_login_bug_done.md"]);
        assert_eq!(visible(&run_search(&store, "docs", false)), vec!["002_write_docs_review.md"]);
        assert_eq!(visible(&run_search(&store, "done", false)), vec!["013_fix_login_bug_done.md"]);
    }

    #[test]
    fn test_full_text_requires_toggle_and_content() {
        let store = store();
        assert!(visible(&run_search(&store, "oauth", false)).is_empty());

        let outcome = run_search(&store, "oauth", true);
        assert_eq!(visible(&outcome), vec!["002_write_docs_review.md"]);
        let preview = outcome.card("002_write_docs_review.md").unwrap().preview_html.as_deref().unwrap();
        assert!(preview.starts_with("...Document the <mark>OAuth</mark> flow."));
        assert!(!preview.contains("<script>"));
        assert_eq!(outcome.message.as_deref(), Some("1 task found (full text)"));
    }

    #[test]
    fn test_highlight_only_on_matching_fields() {
        let outcome = run_search(&store(), "auth", false);
        let card = outcome.card("001_implement_auth_todo.md").unwrap();
        assert_eq!(card.title_html, "implement <mark>auth</mark>");
        assert_eq!(card.id_html, "#001");
    }

    #[test]
    fn test_empty_query_restores_everything() {
        let store = store();
        let outcome = run_search(&store, "", true);
        assert_eq!(outcome.visible_count, 3);
        assert!(outcome.message.is_none());
        for card in &outcome.cards {
            assert!(card.visible);
            assert!(!card.id_html.contains("<mark>"));
            assert!(!card.title_html.contains("<mark>"));
            assert!(card.preview_html.is_none());
        }
    }

    #[test]
    fn test_result_messages() {
        assert_eq!(result_message(0, true), "No matching tasks");
        assert_eq!(result_message(3, false), "3 tasks found");
        assert_eq!(result_message(2, true), "2 tasks found (full text)");
    }

    #[test]
    fn test_missing_id_placeholder() {
        let store = TaskRecordStore::from_filenames(["notes_todo.md"]);
        let outcome = run_search(&store, "", false);
        assert_eq!(outcome.cards[0].id_html, "#---");
    }

    #[test]
    fn test_matching_and_highlighting_agree_on_final_sigma() {
        let mut store = TaskRecordStore::from_filenames(["004_ΟΔΟΣ_todo.md", "005_world_todo.md"]);
        store.set_content("005_world_todo.md", "ο ΚΟΣΜΟΣ είναι".to_string());

        let outcome = run_search(&store, &normalize_query("ΟΔΟΣ"), false);
        let card = outcome.card("004_ΟΔΟΣ_todo.md").unwrap();
        assert!(card.visible);
        assert_eq!(card.title_html, "<mark>ΟΔΟΣ</mark>");

        let outcome = run_search(&store, &normalize_query("ΚΟΣΜΟΣ"), true);
        let card = outcome.card("005_world_todo.md").unwrap();
        assert!(card.visible);
        assert_eq!(card.preview_html.as_deref(), Some("...ο <mark>ΚΟΣΜΟΣ</mark> είναι..."));
    }
}
