//! Frontend errors: compilation database and tree-sitter parsing.

use super::error_code::{self, ErrorckErrorCode};

/// Errors raised by the C/C++ frontend. Per-translation-unit failures are
/// non-fatal: the failed unit is skipped and the run exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to load compilation database from {dir}: {message}")]
    CompilationDatabase { dir: String, message: String },

    #[error("Unsupported source language: {path}")]
    UnsupportedLanguage { path: String },

    #[error("Failed to read {path}: {message}")]
    UnreadableSource { path: String, message: String },

    #[error("Parser produced no tree for {path}")]
    NoTree { path: String },

    #[error("Syntax errors in {path}")]
    SyntaxErrors { path: String },

    #[error("Failed to set parser language: {0}")]
    Language(String),

    #[error("Query compilation failed: {0}")]
    QueryCompilationFailed(String),
}

impl ErrorckErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        error_code::PARSE_ERROR
    }
}
