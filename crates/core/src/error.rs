// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning the task directory
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Task directory not found: {path}")]
    TaskDirNotFound { path: PathBuf },

    #[error("Cannot access task directory: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when reading or writing `.taskconfig.json`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error accessing config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in config {path}: {message}")]
    MalformedJson { path: PathBuf, message: String },
}

/// Errors raised by task commands (`new`, `status`, `setup`)
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("{filename} already exists")]
    AlreadyExists { filename: String },

    #[error("Task {id} not found")]
    NotFound { id: String },

    #[error("Invalid task id '{id}': {reason}")]
    InvalidId { id: String, reason: &'static str },

    #[error("Invalid status '{status}': {reason}")]
    InvalidStatus {
        status: String,
        reason: &'static str,
    },

    #[error("Invalid task name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DiscoveryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::TaskDirNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl TaskError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_error_io_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err = DiscoveryError::io("/test/path", io_err);
        assert!(matches!(err, DiscoveryError::TaskDirNotFound { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = DiscoveryError::io("/test/path", io_err);
        assert!(matches!(err, DiscoveryError::PermissionDenied { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        let err = DiscoveryError::io("/test/path", io_err);
        assert!(matches!(err, DiscoveryError::Io { .. }));
    }

    #[test]
    fn test_task_error_display() {
        let err = TaskError::AlreadyExists {
            filename: "001_auth_todo.md".to_string(),
        };
        assert_eq!(err.to_string(), "001_auth_todo.md already exists");

        let err = TaskError::NotFound {
            id: "042".to_string(),
        };
        assert!(err.to_string().contains("042"));
    }
}
