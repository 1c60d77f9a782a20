// crates/viewer/src/shell.rs
//! The viewer shell: one session's state and the operations on it.
//!
//! Everything here is `&mut self`. The actor in [`crate::actor`] owns the
//! shell, so store mutations never interleave.

use std::sync::Arc;
use std::time::Duration;
use taskmgr_core::{TaskConfig, TaskRecord};
use taskmgr_search::{
    load_history, normalize_query, run_search, HistoryStore, SearchHistory, TaskRecordStore,
};
use tracing::{debug, info, warn};

use crate::loader::{ContentLoader, LoadReport};
use crate::render::{render_board, BoardSnapshot, ColumnLoad};
use crate::source::TaskSource;

/// Shortest auto-reload period accepted from configuration.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// State that lives for one viewer session.
#[derive(Debug, Default)]
pub struct SessionContext {
    pub config: TaskConfig,
    pub store: TaskRecordStore,
    /// Normalized; empty when no filter is active.
    pub query: String,
    pub full_text: bool,
    pub history: SearchHistory,
    pub loader: ContentLoader,
    /// Listing per configured status, from the last reload.
    pub columns: Vec<(String, ColumnLoad)>,
    pub updated_at: String,
    pub revision: u64,
}

pub struct ViewerShell {
    source: Arc<dyn TaskSource>,
    history_store: Arc<dyn HistoryStore>,
    ctx: SessionContext,
}

impl ViewerShell {
    pub fn new(source: Arc<dyn TaskSource>, history_store: Arc<dyn HistoryStore>) -> Self {
        let ctx = SessionContext {
            history: load_history(history_store.as_ref()),
            ..SessionContext::default()
        };
        Self {
            source,
            history_store,
            ctx,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn source(&self) -> &Arc<dyn TaskSource> {
        &self.source
    }

    /// Re-read configuration and every status column, replacing the store.
    ///
    /// A failed column shows a placeholder; the other columns still load.
    pub async fn reload(&mut self) {
        self.ctx.config = match self.source.load_config().await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                TaskConfig::default()
            }
        };

        let mut columns = Vec::with_capacity(self.ctx.config.statuses.len());
        let mut records = Vec::new();
        for status in &self.ctx.config.statuses {
            match self.source.list_tasks(&status.key).await {
                Ok(files) => {
                    records.extend(files.iter().map(|f| TaskRecord::from_filename(f)));
                    columns.push((status.key.clone(), ColumnLoad::Loaded(files)));
                }
                Err(e) => {
                    warn!(status = %status.key, error = %e, "Failed to list tasks");
                    columns.push((status.key.clone(), ColumnLoad::Failed));
                }
            }
        }

        self.ctx.store.replace_all(records);
        self.ctx.columns = columns;
        self.ctx.updated_at = chrono::Local::now().format("%H:%M").to_string();
        info!(tasks = self.ctx.store.len(), "Board reloaded");

        if self.ctx.full_text {
            self.load_content().await;
        }
    }

    async fn load_content(&mut self) -> LoadReport {
        self.ctx
            .loader
            .ensure_content(&mut self.ctx.store, self.source.as_ref())
            .await
    }

    /// Apply raw query text. An empty query removes all filtering.
    pub fn set_query(&mut self, raw: &str) {
        self.ctx.query = normalize_query(raw);
        debug!(query = %self.ctx.query, "Query updated");
    }

    /// Apply the query and record it in history.
    pub fn submit(&mut self, raw: &str) {
        self.set_query(raw);
        if self.ctx.history.submit(raw) {
            if let Err(e) = self.history_store.save(self.ctx.history.entries()) {
                warn!(error = %e, "Failed to save search history");
            }
        }
    }

    pub fn clear(&mut self) {
        self.set_query("");
    }

    /// Toggle full-text mode. Turning it on loads content for every record
    /// still missing it; turning it off keeps what was loaded.
    pub async fn set_full_text(&mut self, enabled: bool) -> LoadReport {
        self.ctx.full_text = enabled;
        if enabled {
            self.load_content().await
        } else {
            LoadReport::default()
        }
    }

    pub fn history(&self) -> &[String] {
        self.ctx.history.entries()
    }

    /// Auto-reload runs only while enabled and no query is active.
    pub fn auto_reload_active(&self) -> bool {
        self.ctx.config.features.auto_refresh && self.ctx.query.is_empty()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.ctx.config.features.refresh_interval).max(MIN_REFRESH_INTERVAL)
    }

    /// Run a search pass and lay out the board.
    pub fn snapshot(&mut self) -> BoardSnapshot {
        self.ctx.revision += 1;
        let outcome = run_search(&self.ctx.store, &self.ctx.query, self.ctx.full_text);
        render_board(
            &self.ctx.config,
            &self.ctx.columns,
            &outcome,
            &self.ctx.updated_at,
            self.ctx.revision,
        )
    }
}
