//! Centralized error types for mailboard.
//!
//! These cover the edges of the library (board files and ingestion). The
//! reconciliation engine itself never errors: it reports an `Outcome`.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mailboard library outside the engine.
#[derive(Error, Debug)]
pub enum BoardError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A JSON document could not be parsed.
    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A board snapshot violates the board invariants.
    #[error("Invalid board in '{path}': {reason}")]
    InvalidBoard { path: PathBuf, reason: String },

    /// An ingested email record is unusable.
    #[error("Invalid email record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Convenience alias for `Result<T, BoardError>`.
pub type Result<T> = std::result::Result<T, BoardError>;

impl BoardError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a `Json` variant from a path and a `serde_json::Error`.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Read a whole file, mapping a missing file to [`BoardError::FileNotFound`].
pub(crate) fn read_file(path: &std::path::Path) -> Result<String> {
    if !path.exists() {
        return Err(BoardError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| BoardError::io(path, e))
}
