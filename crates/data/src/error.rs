use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    /// Filesystem access failed.
    #[error("snapshot io error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Snapshot could not be encoded or decoded.
    #[error("snapshot format error: {0}")]
    Format(#[from] serde_json::Error),
    /// HTTP client could not be built.
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
