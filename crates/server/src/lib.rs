// crates/server/src/lib.rs
//! Task viewer server library.
//!
//! Serves the board page, the raw `docs/logs` tree and a JSON/SSE API backed
//! by a running viewer shell.

pub mod error;
pub mod routes;
pub mod state;

pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use taskmgr_core::ProjectLayout;
use taskmgr_search::{FileHistoryStore, HistoryStore, MemoryHistoryStore};
use taskmgr_viewer::{FsSource, ShellHandle, TaskSource, ViewerShell};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("../assets/index.html");

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - `GET /` board page
/// - `/files/*` raw contents of `docs/logs`
/// - API routes under `/api`
/// - CORS (allows any origin) and request tracing
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let files = ServeDir::new(state.layout.logs_dir());

    Router::new()
        .route("/", get(index_page))
        .nest_service("/files", files)
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start a filesystem-backed viewer shell for `layout`.
///
/// Search history goes to the per-user data dir when there is one.
pub fn start_viewer(layout: &ProjectLayout) -> Arc<AppState> {
    let source: Arc<dyn TaskSource> = Arc::new(FsSource::new(layout.clone()));
    let history: Arc<dyn HistoryStore> = match FileHistoryStore::default_location() {
        Some(store) => {
            tracing::debug!(path = %store.path().display(), "Search history location");
            Arc::new(store)
        }
        None => {
            tracing::warn!("No data directory; search history will not persist");
            Arc::new(MemoryHistoryStore::default())
        }
    };
    let (shell, _task) = ShellHandle::spawn(ViewerShell::new(source.clone(), history));
    AppState::new(layout.clone(), source, shell)
}

/// Bind 127.0.0.1:`port` and serve until the process exits.
///
/// `on_ready` runs once the listener is bound, with the URL to open.
pub async fn serve(
    state: Arc<AppState>,
    port: u16,
    on_ready: impl FnOnce(&str),
) -> std::io::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let url = format!("http://{}", listener.local_addr()?);
    tracing::info!(url = %url, root = %state.layout.root().display(), "Viewer listening");
    on_ready(&url);
    axum::serve(listener, create_app(state)).await
}

// ============================================================================
// Integration Tests
// ============================================================================
