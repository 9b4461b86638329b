//! Error types for the civicdesk-store crate.
//!
//! Every variant of [`StoreError`] means the storage medium itself could
//! not be read or written. Ordinary "no such user" / "no such complaint"
//! conditions are not errors; they are reported through the outcome enums
//! in [`crate::store`].

use std::path::PathBuf;

use thiserror::Error;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the persistence medium.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite operation failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The JSON state file could not be encoded or decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file on disk failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Exclusive access to the state could not be acquired in time.
    #[error("store busy: exclusive access not acquired within {waited_ms} ms")]
    Busy { waited_ms: u64 },

    /// A blocking task was cancelled or panicked.
    #[error("background task failed: {0}")]
    TaskJoin(String),

    /// The store configuration is unusable.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Build an [`StoreError::Io`] for `path`.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(err.to_string())
    }
}
