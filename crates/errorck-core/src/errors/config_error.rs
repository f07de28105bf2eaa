//! Configuration errors: the notable-functions registry.

use super::error_code::{self, ErrorckErrorCode};

/// Errors raised while loading or validating the notable-functions file.
/// All of these are fatal before analysis begins.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to open notable functions file {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Failed to parse notable functions JSON: {0}")]
    InvalidJson(String),

    #[error("Notable functions JSON must be an array")]
    NotAnArray,

    #[error("Notable function entry at index {index} {message}")]
    InvalidEntry { index: usize, message: String },

    #[error("Duplicate notable function name: {0}")]
    DuplicateName(String),
}

impl ErrorckErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
