//! API route handlers for the task viewer.

pub mod board;
pub mod config;
pub mod health;
pub mod search;
pub mod tasks;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET  /api/health - Health check
/// - GET  /api/config - Effective project configuration
/// - GET  /api/board - Current board snapshot
/// - GET  /api/board/stream - SSE stream of board snapshots
/// - POST /api/refresh - Reload now
/// - POST /api/search/input - Debounced keystroke
/// - POST /api/search/submit - Apply query and record history
/// - POST /api/search/clear - Remove the filter
/// - POST /api/search/full-text - Toggle content matching
/// - GET  /api/search/history - Recent queries
/// - GET  /api/tasks/{filename} - Modal view of one task
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", config::router())
        .nest("/api", board::router())
        .nest("/api", search::router())
        .nest("/api", tasks::router())
        .with_state(state)
}
