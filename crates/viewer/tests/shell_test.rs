// Viewer shell, content loader and event loop against an in-memory source.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use taskmgr_core::{
    status_from_filename, SearchIndexDocument, SearchIndexEntry, TaskConfig, TaskRecord,
};
use taskmgr_search::{HistoryStore, MemoryHistoryStore, TaskRecordStore};
use taskmgr_viewer::{
    ContentLoader, LoadReport, ShellHandle, SourceError, TaskSource, ViewerShell,
};
use tokio::time::Instant;

#[derive(Default)]
struct StubSource {
    files: Mutex<Vec<String>>,
    documents: Mutex<HashMap<String, String>>,
    index: Mutex<Option<Vec<String>>>,
    failing_status: Option<String>,
    index_fetches: AtomicUsize,
    document_fetches: AtomicUsize,
}

impl StubSource {
    fn with_tasks(tasks: &[(&str, &str)]) -> Self {
        let source = Self::default();
        for (filename, content) in tasks {
            source.add(filename, content);
        }
        source
    }

    fn add(&self, filename: &str, content: &str) {
        self.files.lock().unwrap().push(filename.to_string());
        self.documents
            .lock()
            .unwrap()
            .insert(filename.to_string(), content.to_string());
    }

    /// Publish a search index covering the given filenames.
    fn index(&self, filenames: &[&str]) {
        *self.index.lock().unwrap() = Some(filenames.iter().map(|f| f.to_string()).collect());
    }

    fn index_fetches(&self) -> usize {
        self.index_fetches.load(Ordering::SeqCst)
    }

    fn document_fetches(&self) -> usize {
        self.document_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskSource for StubSource {
    async fn load_config(&self) -> Result<TaskConfig, SourceError> {
        Ok(TaskConfig::default())
    }

    async fn list_tasks(&self, status: &str) -> Result<Vec<String>, SourceError> {
        if self.failing_status.as_deref() == Some(status) {
            return Err(SourceError::Malformed {
                path: "listing".into(),
                message: "boom".to_string(),
            });
        }
        let mut files: Vec<String> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| status_from_filename(f) == status)
            .cloned()
            .collect();
        files.sort();
        Ok(files)
    }

    async fn fetch_search_index(&self) -> Result<SearchIndexDocument, SourceError> {
        self.index_fetches.fetch_add(1, Ordering::SeqCst);
        let Some(filenames) = self.index.lock().unwrap().clone() else {
            return Err(SourceError::NotFound {
                what: "tasks_search.json".to_string(),
            });
        };
        let documents = self.documents.lock().unwrap();
        let tasks = filenames
            .iter()
            .map(|filename| {
                let record = TaskRecord::from_filename(filename);
                let content = documents.get(filename).cloned().unwrap_or_default();
                SearchIndexEntry {
                    id: record.id,
                    title: record.title,
                    status: record.status,
                    filename: filename.clone(),
                    size: content.encode_utf16().count(),
                    content,
                    last_modified: "2026-01-01T00:00:00.000Z".to_string(),
                }
            })
            .collect();
        Ok(SearchIndexDocument {
            updated: 0,
            version: "1.0".to_string(),
            tasks,
        })
    }

    async fn fetch_document(&self, filename: &str) -> Result<String, SourceError> {
        self.document_fetches.fetch_add(1, Ordering::SeqCst);
        self.documents
            .lock()
            .unwrap()
            .get(filename)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                what: filename.to_string(),
            })
    }
}

fn store_for(source: &StubSource) -> TaskRecordStore {
    let files = source.files.lock().unwrap().clone();
    TaskRecordStore::from_filenames(files.iter().map(String::as_str))
}

fn shell(source: Arc<StubSource>) -> ViewerShell {
    ViewerShell::new(source, Arc::new(MemoryHistoryStore::default()))
}

// ============================================================================
// Content loader
// ============================================================================

#[tokio::test]
async fn loader_adopts_search_index_contents() {
    let source = StubSource::with_tasks(&[("001_a_todo.md", "alpha"), ("002_b_done.md", "beta")]);
    source.index(&["001_a_todo.md", "002_b_done.md"]);
    let mut store = store_for(&source);

    let report = ContentLoader::new().ensure_content(&mut store, &source).await;
    assert_eq!(
        report,
        LoadReport {
            from_index: 2,
            from_documents: 0,
            failed: 0
        }
    );
    assert_eq!(store.get("002_b_done.md").unwrap().content.as_deref(), Some("beta"));
    assert_eq!(source.document_fetches(), 0);
}

#[tokio::test]
async fn loader_falls_back_to_documents_without_index() {
    let source = StubSource::with_tasks(&[("001_a_todo.md", "alpha")]);
    let mut store = store_for(&source);
    let mut loader = ContentLoader::new();

    let report = loader.ensure_content(&mut store, &source).await;
    assert_eq!(report.from_documents, 1);
    assert_eq!(report.from_index, 0);
    assert_eq!(store.get("001_a_todo.md").unwrap().content.as_deref(), Some("alpha"));
}

#[tokio::test]
async fn loader_failed_read_leaves_empty_content_and_is_not_retried() {
    let source = StubSource::with_tasks(&[("001_a_todo.md", "alpha")]);
    let mut store = store_for(&source);
    store.replace_all(vec![
        TaskRecord::from_filename("001_a_todo.md"),
        TaskRecord::from_filename("404_gone_todo.md"),
    ]);
    let mut loader = ContentLoader::new();

    let report = loader.ensure_content(&mut store, &source).await;
    assert_eq!(report.failed, 1);
    assert_eq!(store.get("404_gone_todo.md").unwrap().content.as_deref(), Some(""));

    let fetches = source.document_fetches();
    let again = loader.ensure_content(&mut store, &source).await;
    assert_eq!(again, LoadReport::default());
    assert_eq!(source.document_fetches(), fetches);
}

#[tokio::test]
async fn loader_readopts_cached_index_after_reload() {
    let source = StubSource::with_tasks(&[("001_a_todo.md", "alpha")]);
    source.index(&["001_a_todo.md"]);
    let mut store = store_for(&source);
    let mut loader = ContentLoader::new();
    loader.ensure_content(&mut store, &source).await;

    // A reload replaces the records; a task written after the index was built
    // appears alongside.
    source.add("002_new_todo.md", "fresh");
    store = store_for(&source);
    let report = loader.ensure_content(&mut store, &source).await;

    assert_eq!(source.index_fetches(), 1);
    assert_eq!(report.from_index, 1);
    assert_eq!(report.from_documents, 1);
    assert_eq!(store.get("002_new_todo.md").unwrap().content.as_deref(), Some("fresh"));
}

// ============================================================================
// ViewerShell
// ============================================================================

#[tokio::test]
async fn reload_builds_columns_in_status_order() {
    let source = Arc::new(StubSource::with_tasks(&[
        ("002_b_todo.md", ""),
        ("001_a_todo.md", ""),
        ("003_c_done.md", ""),
    ]));
    let mut shell = shell(source);
    shell.reload().await;

    let board = shell.snapshot();
    assert_eq!(board.total, 3);
    let todo: Vec<_> = board.column("todo").unwrap().cards.iter().map(|c| c.filename.as_str()).collect();
    assert_eq!(todo, vec!["001_a_todo.md", "002_b_todo.md"]);
    assert_eq!(board.column("backlog").unwrap().placeholder, Some("No tasks"));
}

#[tokio::test]
async fn failed_column_shows_placeholder_others_load() {
    let source = Arc::new(StubSource {
        failing_status: Some("todo".to_string()),
        ..StubSource::with_tasks(&[("001_a_todo.md", ""), ("002_b_done.md", "")])
    });
    let mut shell = shell(source);
    shell.reload().await;

    let board = shell.snapshot();
    assert_eq!(board.column("todo").unwrap().placeholder, Some("Failed to load"));
    assert_eq!(board.column("done").unwrap().count, 1);
}

#[tokio::test]
async fn query_filters_and_clear_restores() {
    let source = Arc::new(StubSource::with_tasks(&[
        ("001_implement_auth_todo.md", ""),
        ("002_write_docs_todo.md", ""),
    ]));
    let mut shell = shell(source);
    shell.reload().await;

    shell.set_query("  AUTH ");
    assert!(!shell.auto_reload_active());
    let board = shell.snapshot();
    assert_eq!(board.search.query, "auth");
    assert_eq!(board.search.visible_count, 1);
    assert_eq!(board.search.message.as_deref(), Some("1 task found"));

    shell.clear();
    assert!(shell.auto_reload_active());
    let board = shell.snapshot();
    assert_eq!(board.search.visible_count, 2);
    assert!(board.columns.iter().flat_map(|c| &c.cards).all(|c| c.visible && !c.title_html.contains("<mark>")));
}

#[tokio::test]
async fn full_text_toggle_loads_content_and_keeps_it() {
    let source = Arc::new(StubSource::with_tasks(&[
        ("001_a_todo.md", "mentions OAuth"),
        ("002_b_todo.md", "nothing"),
    ]));
    let mut shell = shell(source.clone());
    shell.reload().await;
    shell.set_query("oauth");
    assert_eq!(shell.snapshot().search.visible_count, 0);

    shell.set_full_text(true).await;
    let board = shell.snapshot();
    assert_eq!(board.search.visible_count, 1);
    assert_eq!(board.search.message.as_deref(), Some("1 task found (full text)"));

    let fetches = source.document_fetches();
    shell.set_full_text(false).await;
    shell.set_full_text(true).await;
    assert_eq!(source.document_fetches(), fetches);
    assert!(shell.context().store.missing_content().is_empty());
}

#[tokio::test]
async fn submit_persists_history() {
    let history: Arc<MemoryHistoryStore> = Arc::new(MemoryHistoryStore::default());
    let mut shell = ViewerShell::new(Arc::new(StubSource::default()), history.clone());
    for q in ["a", "b", "a", "c", "d", "e"] {
        shell.submit(q);
    }
    assert_eq!(shell.history(), ["e", "d", "c", "a", "b"]);
    assert_eq!(history.load().unwrap(), vec!["e", "d", "c", "a", "b"]);

    let reopened = ViewerShell::new(Arc::new(StubSource::default()), history);
    assert_eq!(reopened.history(), ["e", "d", "c", "a", "b"]);
}

// ============================================================================
// Event loop
// ============================================================================

async fn started(source: Arc<StubSource>) -> ShellHandle {
    let (handle, _task) = ShellHandle::spawn(shell(source));
    let mut board = handle.subscribe();
    board.wait_for(|b| b.revision >= 1).await.unwrap();
    handle
}

#[tokio::test(start_paused = true)]
async fn input_is_debounced_to_the_last_keystroke() {
    let source = Arc::new(StubSource::with_tasks(&[("001_implement_auth_todo.md", "")]));
    let handle = started(source).await;
    let mut board = handle.subscribe();
    let _ = board.borrow_and_update();

    handle.input("a").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.input("au").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let last = Instant::now();
    handle.input("auth").await.unwrap();

    board.changed().await.unwrap();
    assert!(last.elapsed() >= Duration::from_millis(300));
    assert_eq!(board.borrow().search.query, "auth");
    assert_eq!(handle.board().search.visible_count, 1);
}

#[tokio::test(start_paused = true)]
async fn submit_applies_immediately_and_records_history() {
    let handle = started(Arc::new(StubSource::with_tasks(&[("001_a_todo.md", "")]))).await;
    handle.input("ignored").await.unwrap();
    handle.submit("a").await.unwrap();

    assert_eq!(handle.board().search.query, "a");
    assert_eq!(handle.history().await.unwrap(), vec!["a"]);

    // The superseded keystroke never lands.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(handle.board().search.query, "a");
}

#[tokio::test(start_paused = true)]
async fn auto_reload_pauses_while_query_active() {
    let source = Arc::new(StubSource::with_tasks(&[("001_a_todo.md", "")]));
    let handle = started(source.clone()).await;

    source.add("002_b_todo.md", "");
    tokio::time::sleep(Duration::from_millis(30_500)).await;
    assert_eq!(handle.board().total, 2);

    handle.submit("zzz").await.unwrap();
    source.add("003_c_todo.md", "");
    tokio::time::sleep(Duration::from_secs(90)).await;
    assert_eq!(handle.board().total, 2);

    // Clearing restarts the interval from zero.
    handle.clear().await.unwrap();
    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(handle.board().total, 2);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(handle.board().total, 3);
}

#[tokio::test(start_paused = true)]
async fn manual_refresh_is_unconditional() {
    let source = Arc::new(StubSource::with_tasks(&[("001_a_todo.md", "")]));
    let handle = started(source.clone()).await;
    handle.submit("a").await.unwrap();

    source.add("002_b_todo.md", "");
    handle.refresh().await.unwrap();
    assert_eq!(handle.board().total, 2);
}

#[tokio::test(start_paused = true)]
async fn full_text_through_handle() {
    let source = Arc::new(StubSource::with_tasks(&[("001_a_todo.md", "the OAuth flow")]));
    let handle = started(source).await;
    handle.submit("oauth").await.unwrap();
    assert_eq!(handle.board().search.visible_count, 0);

    handle.set_full_text(true).await.unwrap();
    let board = handle.board();
    assert_eq!(board.search.visible_count, 1);
    let card = &board.column("todo").unwrap().cards[0];
    assert_eq!(
        card.preview_html.as_deref(),
        Some("...the <mark>OAuth</mark> flow...")
    );
}
