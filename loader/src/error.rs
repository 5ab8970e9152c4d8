//! Error types for document loading.
//!
//! Covers I/O, decoding, and documents that decode fine but do not have the
//! shape of a schema collection.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading documents or configuration.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file decoded, but not into schema documents.
    #[error("invalid document {}: {reason}", .path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    /// The path is neither a directory nor a `.yaml`, `.yml` or `.json` file.
    #[error("unsupported input: {}", .0.display())]
    UnsupportedInput(PathBuf),

    /// No input paths were configured.
    #[error("no schema inputs given")]
    NoInputs,
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
