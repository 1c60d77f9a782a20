// crates/index/src/error.rs
use std::path::PathBuf;
use taskmgr_core::DiscoveryError;
use thiserror::Error;

/// Errors that abort a generator run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("Failed to read task document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {artifact}: {source}")]
    Serialize {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl GenerateError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
