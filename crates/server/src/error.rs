// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use taskmgr_viewer::{ShellClosed, SourceError};
use thiserror::Error;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Viewer shell unavailable")]
    ShellClosed(#[from] ShellClosed),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::TaskNotFound(filename) => {
                tracing::warn!(filename = %filename, "Task not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details("Task not found", format!("Filename: {}", filename)),
                )
            }
            ApiError::Source(source_err) if source_err.is_not_found() => {
                tracing::warn!(error = %source_err, "Requested document not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details("Not found", source_err.to_string()),
                )
            }
            ApiError::Source(source_err) => {
                tracing::error!(error = %source_err, "Task source failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_details("Failed to read tasks", source_err.to_string()),
                )
            }
            ApiError::ShellClosed(_) => {
                tracing::error!("Viewer shell has stopped");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Viewer shell unavailable"),
                )
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Bad request", msg.clone()),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn extract_response(error: ApiError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, error_response)
    }

    #[tokio::test]
    async fn test_task_not_found_returns_404() {
        let (status, body) = extract_response(ApiError::TaskNotFound("001_a_todo.md".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Task not found");
        assert_eq!(body.details.as_deref(), Some("Filename: 001_a_todo.md"));
    }

    #[tokio::test]
    async fn test_source_not_found_returns_404() {
        let error = ApiError::Source(SourceError::NotFound {
            what: "tasks_search.json".into(),
        });
        let (status, body) = extract_response(error).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.details.unwrap().contains("tasks_search.json"));
    }

    #[tokio::test]
    async fn test_source_io_returns_500() {
        let error = ApiError::Source(SourceError::Io {
            path: "/tmp/x".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        let (status, body) = extract_response(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to read tasks");
    }

    #[tokio::test]
    async fn test_bad_request_returns_400() {
        let (status, body) = extract_response(ApiError::BadRequest("empty".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.details.as_deref(), Some("empty"));
    }

    #[tokio::test]
    async fn test_shell_closed_returns_500() {
        let (status, body) = extract_response(ApiError::from(ShellClosed)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Viewer shell unavailable");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_details_omitted_when_absent() {
        let json = serde_json::to_string(&ErrorResponse::new("x")).unwrap();
        assert_eq!(json, r#"{"error":"x"}"#);
    }
}
