// crates/server/src/routes/board.rs
//! Board snapshot endpoints.
//!
//! - `GET /api/board`: the latest snapshot as JSON
//! - `GET /api/board/stream`: SSE, one `board` event per published snapshot
//! - `POST /api/refresh`: unconditional reload

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use taskmgr_viewer::BoardSnapshot;

use crate::error::ApiResult;
use crate::state::AppState;

pub(crate) fn board_json(state: &AppState) -> Json<BoardSnapshot> {
    Json(state.shell.board().as_ref().clone())
}

/// GET /api/board
pub async fn get_board(State(state): State<Arc<AppState>>) -> Json<BoardSnapshot> {
    board_json(&state)
}

/// POST /api/refresh - Reload config and every column now, whatever the
/// query or auto-reload state.
pub async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult<Json<BoardSnapshot>> {
    state.shell.refresh().await?;
    Ok(board_json(&state))
}

/// GET /api/board/stream
///
/// Sends the current snapshot on connect, then every new one. The stream
/// ends when the shell stops.
pub async fn board_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.shell.subscribe();

    let stream = async_stream::stream! {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            yield Ok(Event::default()
                .event("board")
                .id(snapshot.revision.to_string())
                .data(serde_json::to_string(snapshot.as_ref()).unwrap_or_default()));
            if rx.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/board", get(get_board))
        .route("/board/stream", get(board_stream))
        .route("/refresh", post(refresh))
}
