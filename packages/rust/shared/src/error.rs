//! Error types for qaextract.
//!
//! Library crates use [`QaExtractError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all qaextract operations.
#[derive(Debug, thiserror::Error)]
pub enum QaExtractError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The input file or directory does not exist.
    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// A directory was given but it holds no recognized text files.
    #[error("no input files with a recognized extension in {}", dir.display())]
    NoInputFiles { dir: PathBuf },

    /// File bytes are not valid UTF-8.
    #[error("encoding error in {}: not valid UTF-8 (first bad byte at offset {valid_up_to})", path.display())]
    Decode { path: PathBuf, valid_up_to: usize },

    /// No question/answer pairs were extracted from any input.
    #[error("no questions or answers found in {files} file(s)")]
    NoContent { files: usize },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing to the record sink failed after `written` complete records.
    #[error("failed to write record {}: {source}", written + 1)]
    Emit {
        written: usize,
        source: std::io::Error,
    },

    /// Record serialization error.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Data validation error (empty pair field, malformed record, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QaExtractError>;

impl QaExtractError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the file could not be decoded as text.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
