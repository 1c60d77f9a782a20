// crates/server/src/routes/tasks.rs
//! Task detail for the modal.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use taskmgr_viewer::{is_plain_filename, open_task, TaskModal};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/tasks/{filename} - Title and rendered body of one document.
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Json<TaskModal>> {
    if !is_plain_filename(&filename) {
        return Err(ApiError::BadRequest(format!("Invalid task filename: {filename}")));
    }
    match open_task(state.source.as_ref(), &filename).await {
        Ok(modal) => Ok(Json(modal)),
        Err(e) if e.is_not_found() => Err(ApiError::TaskNotFound(filename)),
        Err(e) => Err(e.into()),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/tasks/{filename}", get(get_task))
}
