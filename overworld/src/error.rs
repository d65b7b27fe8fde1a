//! Error types for loading world data.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading or decoding a data file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the file simply isn't there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Failure while loading a [`crate::WorldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("chunk dimensions must be positive, got {width}x{height}")]
    InvalidChunkSize { width: i32, height: i32 },
}
