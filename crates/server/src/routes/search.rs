// crates/server/src/routes/search.rs
//! Search controls. Every request is forwarded to the viewer shell, which
//! owns the query, the full-text toggle and the history.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use taskmgr_viewer::BoardSnapshot;

use crate::error::ApiResult;
use crate::routes::board::board_json;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct FullTextRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub struct HistoryResponse {
    /// Most recent first.
    pub history: Vec<String>,
}

/// POST /api/search/input - A keystroke. Applied after the debounce delay,
/// so the response carries no board.
async fn input(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryRequest>,
) -> ApiResult<StatusCode> {
    state.shell.input(body.query).await?;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/search/submit - Apply now and remember the query.
async fn submit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryRequest>,
) -> ApiResult<Json<BoardSnapshot>> {
    state.shell.submit(body.query).await?;
    Ok(board_json(&state))
}

/// POST /api/search/clear
async fn clear(State(state): State<Arc<AppState>>) -> ApiResult<Json<BoardSnapshot>> {
    state.shell.clear().await?;
    Ok(board_json(&state))
}

/// POST /api/search/full-text - Toggle content matching. Turning it on
/// waits for content to load.
async fn full_text(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FullTextRequest>,
) -> ApiResult<Json<BoardSnapshot>> {
    state.shell.set_full_text(body.enabled).await?;
    Ok(board_json(&state))
}

/// GET /api/search/history
async fn history(State(state): State<Arc<AppState>>) -> ApiResult<Json<HistoryResponse>> {
    Ok(Json(HistoryResponse {
        history: state.shell.history().await?,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search/input", post(input))
        .route("/search/submit", post(submit))
        .route("/search/clear", post(clear))
        .route("/search/full-text", post(full_text))
        .route("/search/history", get(history))
}
