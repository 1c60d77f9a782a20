// crates/server/src/routes/config.rs
//! Project configuration as the page sees it.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use taskmgr_core::TaskConfig;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/config - The effective `.taskconfig.json`, defaults merged in.
pub async fn get_config(State(state): State<Arc<AppState>>) -> ApiResult<Json<TaskConfig>> {
    Ok(Json(state.source.load_config().await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/config", get(get_config))
}
