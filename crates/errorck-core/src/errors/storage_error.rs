//! Storage errors: the SQLite sink.

use super::error_code::{self, ErrorckErrorCode};

/// Errors raised by the sink. Creation failures are fatal; insert failures
/// latch a sticky error on the emitter instead of aborting the run.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Database path is a directory: {path}")]
    PathIsDirectory { path: String },

    #[error("Failed to remove existing database {path}: {message}")]
    RemoveFailed { path: String, message: String },

    #[error("SQLite error: {message}")]
    SqliteError { message: String },
}

impl ErrorckErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}
